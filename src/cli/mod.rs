//! CLI module for content-review
//!
//! Provides command-line interface for:
//! - children: List a node's children as a session sees them
//! - resolve: Show the version override for one node

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, SessionArgs};
pub use commands::{children, resolve, run, run_command, Session};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
