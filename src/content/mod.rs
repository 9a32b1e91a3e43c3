//! Content model
//!
//! Value types shared by the resolver and its collaborators:
//! - `ContentReference` - node identity with optional version marker
//! - `ContentVersion` / `VersionStatus` - version metadata
//! - `LoaderOptions` / `PageWindow` - pass-through load configuration
//! - `ContentItem` - capability trait for resolved items
//!
//! All of these are owned by the content repository and treated as
//! immutable values by the resolver.

mod item;
mod options;
mod reference;
mod version;

pub use item::{ChildEntry, ChildReference, ChildSortOrder, ContentHeader, ContentItem, ContentKind};
pub use options::{LanguageSelection, LoaderOptions, PageWindow};
pub use reference::{ContentReference, ParseReferenceError};
pub use version::{ContentVersion, VersionState, VersionStatus};
