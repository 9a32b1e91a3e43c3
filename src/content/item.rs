//! Content item capabilities
//!
//! The resolver is generic over the item type it returns. An item type
//! declares which content kinds it can represent and, when the underlying
//! content is versionable, exposes its version state.

use serde::{Deserialize, Serialize};

use super::{ContentReference, VersionState};

/// Broad classification used for type-filtered child listings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Page,
    Block,
    Media,
    Folder,
}

/// How a parent orders its children on the published site.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChildSortOrder {
    #[default]
    None,
    /// Manual ordering by sort index
    Index,
    Alphabetical,
    CreatedAscending,
    CreatedDescending,
    ChangedDescending,
    PublishedAscending,
    PublishedDescending,
}

/// Capability interface for content returned by the resolver.
pub trait ContentItem: Clone + Send + Sync {
    /// Kinds this type can represent. `None` accepts every kind.
    fn accepted_kinds() -> Option<&'static [ContentKind]> {
        None
    }

    /// Reference this item was loaded from.
    fn content_link(&self) -> &ContentReference;

    /// Display name used for alphabetical ordering.
    fn name(&self) -> &str;

    /// Version status, if the content supports version introspection.
    fn version_state(&self) -> Option<VersionState> {
        None
    }
}

/// Untyped view of a node: what the resolver needs to know about a parent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentHeader {
    pub reference: ContentReference,
    /// Active language branch; `None` for non-localizable content
    pub locale: Option<String>,
    /// Configured child order; `None` for content that cannot order children
    pub child_sort_order: Option<ChildSortOrder>,
}

/// A raw child listing entry as reported by a content provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildReference {
    pub content_link: ContentReference,
    pub kind: ContentKind,
}

impl ChildReference {
    pub fn new(content_link: ContentReference, kind: ContentKind) -> Self {
        Self { content_link, kind }
    }
}

/// Pairing of a child as listed and the reference chosen for loading.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChildEntry {
    pub original: ContentReference,
    pub resolved: ContentReference,
}

impl ChildEntry {
    /// Entry that keeps the listed reference.
    pub fn unchanged(original: ContentReference) -> Self {
        Self {
            resolved: original.clone(),
            original,
        }
    }
}
