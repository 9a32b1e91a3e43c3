//! JSON fixture format for the in-memory store
//!
//! ```json
//! {
//!   "nodes": [
//!     {"id": 1, "child_sort_order": "alphabetical",
//!      "versions": [{"work_id": 10, "name": "Home", "locale": "en", "status": "published"}]},
//!     {"id": 5, "parent": 1,
//!      "versions": [{"work_id": 50, "name": "News", "locale": "en", "status": "published"},
//!                   {"work_id": 51, "name": "News (draft)", "locale": "en",
//!                    "status": "checked_in", "common_draft": true}]}
//!   ],
//!   "projects": [{"id": 3, "items": [{"id": 5, "work_id": 51}]}]
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::{ChildSortOrder, ContentKind, ContentReference, VersionStatus};
use crate::review::ProjectId;

/// Fixture loading errors
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read fixture: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid fixture JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid fixture: {0}")]
    Invalid(String),
}

/// Top-level fixture document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreFixture {
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,
}

/// One content node and its versions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: u64,
    #[serde(default)]
    pub parent: Option<u64>,
    #[serde(default = "default_kind")]
    pub kind: ContentKind,
    #[serde(default)]
    pub child_sort_order: Option<ChildSortOrder>,
    /// Whether loaded items expose version status (default: true)
    #[serde(default = "default_versionable")]
    pub versionable: bool,
    pub versions: Vec<VersionRecord>,
}

fn default_kind() -> ContentKind {
    ContentKind::Page
}

fn default_versionable() -> bool {
    true
}

/// One version of a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionRecord {
    pub work_id: u64,
    pub name: String,
    #[serde(default)]
    pub locale: Option<String>,
    pub status: VersionStatus,
    #[serde(default)]
    pub start_publish: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stop_publish: Option<DateTime<Utc>>,
    /// Marks the shared working version of its language branch
    #[serde(default)]
    pub common_draft: bool,
}

impl VersionRecord {
    pub(crate) fn in_locale(&self, locale: &str) -> bool {
        self.locale.as_deref().map_or(true, |l| l == locale)
    }
}

/// A review project and the versions it pins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: ProjectId,
    pub items: Vec<ContentReference>,
}

impl StoreFixture {
    /// Checks ids are unique and references point at known nodes/versions.
    pub fn validate(&self) -> Result<(), FixtureError> {
        let mut seen = std::collections::HashSet::new();
        for node in &self.nodes {
            if node.id == 0 {
                return Err(FixtureError::Invalid("node id 0 is reserved".to_string()));
            }
            if !seen.insert(node.id) {
                return Err(FixtureError::Invalid(format!("duplicate node id {}", node.id)));
            }
            let mut work_ids = std::collections::HashSet::new();
            for version in &node.versions {
                if !work_ids.insert(version.work_id) {
                    return Err(FixtureError::Invalid(format!(
                        "duplicate work id {} on node {}",
                        version.work_id, node.id
                    )));
                }
            }
        }

        for node in &self.nodes {
            if let Some(parent) = node.parent {
                if !seen.contains(&parent) {
                    return Err(FixtureError::Invalid(format!(
                        "node {} has unknown parent {}",
                        node.id, parent
                    )));
                }
            }
        }

        for project in &self.projects {
            for item in &project.items {
                if item.work_id().is_none() {
                    return Err(FixtureError::Invalid(format!(
                        "project {} pins unversioned reference {}",
                        project.id, item
                    )));
                }
            }
        }

        Ok(())
    }
}
