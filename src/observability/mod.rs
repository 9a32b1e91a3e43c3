//! Observability for content-review
//!
//! Events are emitted through `tracing` with an upper-snake `event`
//! field naming what happened:
//! - `CHILDREN_RESOLVE_*` lifecycle of a children resolution
//! - `CHILD_OMITTED` a child dropped from a review listing
//! - `COMMON_DRAFT_NOT_FOUND` / `PROJECT_VERSION_*` selector fallbacks
//!
//! Observability is read-only and never influences resolution.

mod logger;
mod scope;

pub use logger::{init_logging, LogFormat};
pub use scope::ResolutionScope;
