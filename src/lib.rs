//! content-review - Draft-aware content tree resolution
//!
//! Lets reviewers browse a content tree and see, at every node, the
//! version they are entitled to see: a project pin, a common draft, or
//! the published version. Outside a review session every lookup is a
//! pass-through to the content repository.

pub mod cli;
pub mod config;
pub mod content;
pub mod memory;
pub mod observability;
pub mod resolver;
pub mod review;
