//! Draft-aware resolution
//!
//! This module provides:
//! - `VersionSelector` - project / common-draft / published selection
//! - `ExpiryFilter` - published-but-past-stop-publish detection
//! - `OrderingPolicy` - alphabetical re-sort of complete result sets
//! - `DraftAwareChildrenResolver` - the children listing entry point
//! - Collaborator traits the resolver reads through
//!
//! Resolution is a stateless read pipeline. Nothing here holds mutable
//! shared state, so concurrent calls need no locking.

mod children;
mod collaborators;
mod errors;
mod expiry;
mod guard;
mod ordering;
mod strategy;

pub use children::{ChildrenResolution, DraftAwareChildrenResolver, Omission, OmissionReason};
pub use collaborators::{
    ChildrenSorter, CommonDraftStore, ContentProvider, ContentRepository, ProjectOverlay,
    ProviderMap, ProviderRegistry,
};
pub use errors::{ResolverError, ResolverResult, StoreError, StoreResult};
pub use expiry::ExpiryFilter;
pub use guard::{CancelToken, ResolveGuard};
pub use ordering::{AlphabeticalSorter, OrderingPolicy};
pub use strategy::{NoOverrideReason, VersionOverride, VersionSelector};
