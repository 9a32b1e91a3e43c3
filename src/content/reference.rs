//! ContentReference - identity of a content node, optionally pinned to a version
//!
//! A reference is made of:
//! - a numeric id
//! - an optional provider name (string key for content served by a non-default provider)
//! - an optional work id (the version marker)
//!
//! Two references with the same identity and different work ids denote
//! different versions of the same logical node.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Reference to a content node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentReference {
    id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    work_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    provider: Option<String>,
}

impl ContentReference {
    /// The empty reference. Never valid as a resolution input.
    pub const EMPTY: ContentReference = ContentReference {
        id: 0,
        work_id: None,
        provider: None,
    };

    /// Creates a version-less reference served by the default provider.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            work_id: None,
            provider: None,
        }
    }

    /// Creates a reference pinned to a specific version.
    pub fn with_version(id: u64, work_id: u64) -> Self {
        Self {
            id,
            work_id: Some(work_id),
            provider: None,
        }
    }

    /// Returns this reference served by the named provider.
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[inline]
    pub fn work_id(&self) -> Option<u64> {
        self.work_id
    }

    #[inline]
    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    /// True if the reference has no identity.
    pub fn is_empty(&self) -> bool {
        self.id == 0 && self.provider.is_none()
    }

    /// True if the reference carries a version marker.
    pub fn is_versioned(&self) -> bool {
        self.work_id.is_some()
    }

    /// Strips the version marker, keeping the identity.
    pub fn without_version(&self) -> Self {
        Self {
            work_id: None,
            ..self.clone()
        }
    }

    /// True if both references denote the same logical node.
    pub fn same_identity(&self, other: &ContentReference) -> bool {
        self.id == other.id && self.provider == other.provider
    }
}

impl fmt::Display for ContentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)?;
        if let Some(work_id) = self.work_id {
            write!(f, "_{}", work_id)?;
        }
        if let Some(provider) = &self.provider {
            write!(f, "__{}", provider)?;
        }
        Ok(())
    }
}

/// Error parsing a reference from its display form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid content reference: {0}")]
pub struct ParseReferenceError(String);

impl FromStr for ContentReference {
    type Err = ParseReferenceError;

    /// Parses `id`, `id_workid`, `id__provider` or `id_workid__provider`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseReferenceError(s.to_string());

        let (head, provider) = match s.split_once("__") {
            Some((head, provider)) if !provider.is_empty() => (head, Some(provider.to_string())),
            Some(_) => return Err(invalid()),
            None => (s, None),
        };

        let (id, work_id) = match head.split_once('_') {
            Some((id, work)) => (id, Some(work.parse::<u64>().map_err(|_| invalid())?)),
            None => (head, None),
        };
        let id = id.trim().parse::<u64>().map_err(|_| invalid())?;

        Ok(Self {
            id,
            work_id,
            provider,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_reference() {
        assert!(ContentReference::EMPTY.is_empty());
        assert!(ContentReference::default().is_empty());
        assert!(!ContentReference::new(1).is_empty());
        // Provider-keyed content may use id 0
        assert!(!ContentReference::new(0).with_provider("media").is_empty());
    }

    #[test]
    fn test_without_version_keeps_identity() {
        let versioned = ContentReference::with_version(5, 12).with_provider("catalog");
        let stripped = versioned.without_version();

        assert_eq!(stripped.work_id(), None);
        assert_eq!(stripped.provider(), Some("catalog"));
        assert!(stripped.same_identity(&versioned));
        assert_ne!(stripped, versioned);
    }

    #[test]
    fn test_display_and_parse() {
        let reference = ContentReference::with_version(5, 12).with_provider("catalog");
        assert_eq!(reference.to_string(), "5_12__catalog");
        assert_eq!("5_12__catalog".parse::<ContentReference>().unwrap(), reference);

        assert_eq!("7".parse::<ContentReference>().unwrap(), ContentReference::new(7));
        assert_eq!(
            "7_3".parse::<ContentReference>().unwrap(),
            ContentReference::with_version(7, 3)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<ContentReference>().is_err());
        assert!("abc".parse::<ContentReference>().is_err());
        assert!("5_x".parse::<ContentReference>().is_err());
        assert!("5__".parse::<ContentReference>().is_err());
    }
}
