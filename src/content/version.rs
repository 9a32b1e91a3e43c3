//! Content versions and their publishing status

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ContentReference;

/// Publishing status of a single content version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionStatus {
    NotCreated,
    /// Working copy being edited
    Draft,
    CheckedIn,
    AwaitingApproval,
    Rejected,
    /// Approved, waiting for its start-publish time
    DelayedPublish,
    Published,
    PreviouslyPublished,
    Expired,
}

impl VersionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersionStatus::NotCreated => "not_created",
            VersionStatus::Draft => "draft",
            VersionStatus::CheckedIn => "checked_in",
            VersionStatus::AwaitingApproval => "awaiting_approval",
            VersionStatus::Rejected => "rejected",
            VersionStatus::DelayedPublish => "delayed_publish",
            VersionStatus::Published => "published",
            VersionStatus::PreviouslyPublished => "previously_published",
            VersionStatus::Expired => "expired",
        }
    }

    #[inline]
    pub fn is_published(&self) -> bool {
        matches!(self, VersionStatus::Published)
    }
}

/// The status pair a versionable content item exposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VersionState {
    pub status: VersionStatus,
    pub stop_publish: Option<DateTime<Utc>>,
}

impl VersionState {
    pub fn new(status: VersionStatus) -> Self {
        Self {
            status,
            stop_publish: None,
        }
    }

    pub fn with_stop_publish(mut self, stop_publish: DateTime<Utc>) -> Self {
        self.stop_publish = Some(stop_publish);
        self
    }
}

/// Metadata record for one version of a node.
///
/// Immutable value owned by the content repository.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentVersion {
    /// Versioned reference to this version
    pub reference: ContentReference,
    pub status: VersionStatus,
    #[serde(default)]
    pub start_publish: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stop_publish: Option<DateTime<Utc>>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub name: String,
}

impl ContentVersion {
    pub fn new(reference: ContentReference, status: VersionStatus) -> Self {
        Self {
            reference,
            status,
            start_publish: None,
            stop_publish: None,
            locale: None,
            name: String::new(),
        }
    }

    pub fn state(&self) -> VersionState {
        VersionState {
            status: self.status,
            stop_publish: self.stop_publish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde_names() {
        let json = serde_json::to_string(&VersionStatus::AwaitingApproval).unwrap();
        assert_eq!(json, "\"awaiting_approval\"");

        let parsed: VersionStatus = serde_json::from_str("\"published\"").unwrap();
        assert!(parsed.is_published());
        assert_eq!(parsed.as_str(), "published");
    }

    #[test]
    fn test_version_state_from_version() {
        let stop = Utc::now();
        let mut version =
            ContentVersion::new(ContentReference::with_version(3, 9), VersionStatus::Published);
        version.stop_publish = Some(stop);

        let state = version.state();
        assert_eq!(state.status, VersionStatus::Published);
        assert_eq!(state.stop_publish, Some(stop));
    }
}
