//! Collaborator contracts
//!
//! The resolver only reads through these traits. Implementations must be
//! safe for concurrent reads.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::content::{
    ChildReference, ContentHeader, ContentKind, ContentReference, ContentVersion, LoaderOptions,
    PageWindow,
};
use crate::review::ProjectId;

use super::errors::{StoreError, StoreResult};

/// Typed access to the content repository.
pub trait ContentRepository<T>: Send + Sync {
    /// Loads the content at `reference`. `Ok(None)` if it does not exist.
    fn get(&self, reference: &ContentReference, options: &LoaderOptions) -> StoreResult<Option<T>>;

    /// Plain children lookup used outside review sessions.
    fn get_children(
        &self,
        parent: &ContentReference,
        options: &LoaderOptions,
        window: PageWindow,
    ) -> StoreResult<Vec<T>>;

    /// Untyped lookup of a node's locale and child ordering.
    fn get_header(
        &self,
        reference: &ContentReference,
        options: &LoaderOptions,
    ) -> StoreResult<Option<ContentHeader>>;
}

/// Translates a content identity into raw child listings.
pub trait ContentProvider: Send + Sync {
    fn child_references(
        &self,
        parent: &ContentReference,
        locale: Option<&str>,
        kinds: Option<&[ContentKind]>,
        window: PageWindow,
    ) -> StoreResult<Vec<ChildReference>>;
}

/// Maps a reference to the provider responsible for it.
pub trait ProviderRegistry: Send + Sync {
    fn provider_for(&self, reference: &ContentReference) -> StoreResult<Arc<dyn ContentProvider>>;
}

/// Per-project version pins.
pub trait ProjectOverlay: Send + Sync {
    /// Version of `base` pinned to `project_id`, if the project overrides it.
    fn project_reference(
        &self,
        base: &ContentReference,
        project_id: ProjectId,
        locale: &str,
    ) -> StoreResult<Option<ContentReference>>;
}

/// Shared working versions pending approval.
pub trait CommonDraftStore: Send + Sync {
    /// Fails with `StoreError::NotFound` when `base` has no common draft.
    fn load_common_draft(&self, base: &ContentReference, locale: &str)
        -> StoreResult<ContentVersion>;
}

/// Name comparator used for alphabetical child ordering.
pub trait ChildrenSorter: Send + Sync {
    fn compare_names(&self, a: &str, b: &str, locale: Option<&str>) -> Ordering;
}

/// Provider registry keyed by provider name.
///
/// References without a provider name go to the default provider.
#[derive(Clone)]
pub struct ProviderMap {
    default: Arc<dyn ContentProvider>,
    named: HashMap<String, Arc<dyn ContentProvider>>,
}

impl ProviderMap {
    pub fn new(default: Arc<dyn ContentProvider>) -> Self {
        Self {
            default,
            named: HashMap::new(),
        }
    }

    /// Registers a provider for references carrying `name`.
    pub fn register(mut self, name: impl Into<String>, provider: Arc<dyn ContentProvider>) -> Self {
        self.named.insert(name.into(), provider);
        self
    }
}

impl fmt::Debug for ProviderMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.named.keys().collect();
        names.sort();
        f.debug_struct("ProviderMap").field("named", &names).finish()
    }
}

impl ProviderRegistry for ProviderMap {
    fn provider_for(&self, reference: &ContentReference) -> StoreResult<Arc<dyn ContentProvider>> {
        match reference.provider() {
            None => Ok(Arc::clone(&self.default)),
            Some(name) => self
                .named
                .get(name)
                .cloned()
                .ok_or_else(|| StoreError::ProviderMissing(name.to_string())),
        }
    }
}
