//! CLI argument definitions using clap
//!
//! Commands:
//! - content-review children --store <path> --parent <ref> [...]
//! - content-review resolve --store <path> --content <ref> [...]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::content::ContentReference;
use crate::review::ProjectId;

/// content-review - Draft-aware content tree browsing for reviewers
#[derive(Parser, Debug)]
#[command(name = "content-review")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command
#[derive(Args, Debug, Clone)]
pub struct SessionArgs {
    /// Path to the content store fixture (JSON)
    #[arg(long)]
    pub store: PathBuf,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Browse as a reviewer (common drafts)
    #[arg(long)]
    pub review: bool,

    /// Browse as a reviewer of this project (implies --review)
    #[arg(long)]
    pub project: Option<ProjectId>,

    /// Preferred locale (default: config default_locale)
    #[arg(long)]
    pub locale: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the children of a node as the session sees them
    Children {
        #[command(flatten)]
        session: SessionArgs,

        /// Parent reference, e.g. `5` or `5_12`
        #[arg(long)]
        parent: ContentReference,

        /// First row of the window (-1: unbounded)
        #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
        start: i32,

        /// Maximum rows (-1: unbounded)
        #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
        max: i32,
    },

    /// Show which version of a single node the session sees
    Resolve {
        #[command(flatten)]
        session: SessionArgs,

        /// Content reference, e.g. `5`
        #[arg(long)]
        content: ContentReference,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
