//! CLI command implementations
//!
//! Each command loads the configuration and the content store fixture,
//! builds a review context from the flags, runs one resolution and
//! writes a single JSON object to stdout.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::config::ReviewConfig;
use crate::content::{ContentReference, LoaderOptions, PageWindow};
use crate::memory::{ContentNode, InMemoryContentStore};
use crate::observability::init_logging;
use crate::resolver::{DraftAwareChildrenResolver, VersionOverride};
use crate::review::ReviewContext;

use super::args::{Command, SessionArgs};
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Everything one command needs: config, resolver and review context.
pub struct Session {
    pub config: ReviewConfig,
    pub store: Arc<InMemoryContentStore>,
    pub resolver: DraftAwareChildrenResolver<ContentNode>,
    pub context: ReviewContext,
}

impl Session {
    /// Loads config and store and builds the review context from flags.
    pub fn open(args: &SessionArgs) -> CliResult<Self> {
        let config = match &args.config {
            Some(path) => ReviewConfig::load(path)?,
            None => ReviewConfig::default(),
        };
        Self::with_config(args, config)
    }

    fn with_config(args: &SessionArgs, config: ReviewConfig) -> CliResult<Self> {
        let store = Arc::new(load_store(&args.store)?);
        let resolver = store.resolver().with_config(&config);

        let locale = args
            .locale
            .clone()
            .unwrap_or_else(|| config.default_locale.clone());
        let context = match (args.project, args.review) {
            (Some(project_id), _) => ReviewContext::for_project(project_id, locale),
            (None, true) => ReviewContext::reviewing(locale),
            (None, false) => ReviewContext::inactive(locale),
        };

        Ok(Self {
            config,
            store,
            resolver,
            context,
        })
    }

    /// Default list options: the session locale with fallback.
    pub fn loader_options(&self) -> LoaderOptions {
        LoaderOptions::fallback(self.context.preferred_locale.clone())
    }

    /// Resolves the children of `parent` into the response payload.
    pub fn children(&self, parent: &ContentReference, window: PageWindow) -> CliResult<Value> {
        let resolution = self.resolver.children_detailed(
            &self.context,
            parent,
            &self.loader_options(),
            window,
            &self.config.guard(),
        )?;

        Ok(json!({
            "parent": parent,
            "review": self.context.active,
            "project_id": self.context.project_id,
            "locale": self.context.preferred_locale,
            "items": resolution.items,
            "omitted": resolution.omitted,
            "resorted": resolution.resorted,
            "passthrough": resolution.passthrough,
        }))
    }

    /// Resolves the version override of `content` into the response payload.
    pub fn resolve(&self, content: &ContentReference) -> CliResult<Value> {
        if !self.context.active {
            return Ok(json!({
                "content": content,
                "strategy": "published",
                "reference": content,
            }));
        }

        let outcome = self.resolver.selector().resolve(content, &self.context)?;
        let (strategy, reference, reason) = match &outcome {
            VersionOverride::Project(r) => ("project", r.clone(), None),
            VersionOverride::Draft(r) => ("draft", r.clone(), None),
            VersionOverride::None(reason) => ("published", content.clone(), Some(reason.as_str())),
        };

        Ok(json!({
            "content": content,
            "strategy": strategy,
            "reference": reference,
            "reason": reason,
        }))
    }
}

fn load_store(path: &Path) -> CliResult<InMemoryContentStore> {
    Ok(InMemoryContentStore::load(path)?)
}

/// Main entry point for the CLI
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Children {
            session,
            parent,
            start,
            max,
        } => children(&session, &parent, PageWindow::from_raw(start, max)),
        Command::Resolve { session, content } => resolve(&session, &content),
    }
}

/// List the children of `parent`
pub fn children(args: &SessionArgs, parent: &ContentReference, window: PageWindow) -> CliResult<()> {
    let result = open_session(args).and_then(|session| session.children(parent, window));
    respond(&mut io::stdout().lock(), result)
}

/// Show the version override of `content`
pub fn resolve(args: &SessionArgs, content: &ContentReference) -> CliResult<()> {
    let result = open_session(args).and_then(|session| session.resolve(content));
    respond(&mut io::stdout().lock(), result)
}

fn open_session(args: &SessionArgs) -> CliResult<Session> {
    let session = Session::open(args)?;
    init_logging(session.config.log_format);
    Ok(session)
}

fn respond(out: &mut impl Write, result: CliResult<Value>) -> CliResult<()> {
    match result {
        Ok(data) => write_response(out, data),
        Err(e) => {
            write_error(out, e.code_str(), e.message())?;
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "nodes": [
            {"id": 1, "child_sort_order": "alphabetical",
             "versions": [{"work_id": 10, "name": "Home", "locale": "en", "status": "published"}]},
            {"id": 4, "parent": 1,
             "versions": [{"work_id": 40, "name": "Zoo", "locale": "en", "status": "published"}]},
            {"id": 5, "parent": 1,
             "versions": [
                {"work_id": 50, "name": "News", "locale": "en", "status": "published"},
                {"work_id": 51, "name": "Announcements", "locale": "en", "status": "checked_in", "common_draft": true}
             ]}
        ]
    }"#;

    fn session(review: bool) -> (tempfile::NamedTempFile, Session) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", FIXTURE).unwrap();

        let args = SessionArgs {
            store: file.path().to_path_buf(),
            config: None,
            review,
            project: None,
            locale: None,
        };
        let session = Session::open(&args).unwrap();
        (file, session)
    }

    #[test]
    fn test_children_outside_review() {
        let (_file, session) = session(false);
        let data = session
            .children(&ContentReference::new(1), PageWindow::ALL)
            .unwrap();

        assert_eq!(data["passthrough"], true);
        assert_eq!(data["items"][0]["name"], "News");
        assert_eq!(data["items"][1]["name"], "Zoo");
    }

    #[test]
    fn test_children_in_review_shows_drafts() {
        let (_file, session) = session(true);
        let data = session
            .children(&ContentReference::new(1), PageWindow::ALL)
            .unwrap();

        assert_eq!(data["passthrough"], false);
        assert_eq!(data["resorted"], true);
        assert_eq!(data["items"][0]["name"], "Announcements");
        assert_eq!(data["items"][0]["content_link"]["work_id"], 51);
        assert_eq!(data["items"][1]["name"], "Zoo");
    }

    #[test]
    fn test_resolve_reports_strategy() {
        let (_file, session) = session(true);

        let draft = session.resolve(&ContentReference::new(5)).unwrap();
        assert_eq!(draft["strategy"], "draft");
        assert_eq!(draft["reference"]["work_id"], 51);

        // Common draft of node 4 is its published version
        let published = session.resolve(&ContentReference::new(4)).unwrap();
        assert_eq!(published["strategy"], "draft");
        assert_eq!(published["reference"]["work_id"], 40);
    }

    #[test]
    fn test_empty_parent_is_rejected() {
        let (_file, session) = session(true);
        let err = session
            .children(&ContentReference::EMPTY, PageWindow::ALL)
            .unwrap_err();
        assert!(err.message().contains("REVIEW_INVALID_ARGUMENT"));
    }

    #[test]
    fn test_missing_store_file_is_reported() {
        let args = SessionArgs {
            store: "/nonexistent/tree.json".into(),
            config: None,
            review: true,
            project: None,
            locale: None,
        };
        let mut out = Vec::new();
        let result = open_session(&args)
            .and_then(|session| session.children(&ContentReference::new(1), PageWindow::ALL));
        let err = respond(&mut out, result).unwrap_err();
        assert_eq!(err.code_str(), "REVIEW_CLI_STORE_ERROR");

        let printed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(printed["status"], "error");
        assert_eq!(printed["code"], "REVIEW_CLI_STORE_ERROR");
    }

    #[test]
    fn test_missing_store_file() {
        let args = SessionArgs {
            store: "/nonexistent/tree.json".into(),
            config: None,
            review: false,
            project: None,
            locale: None,
        };
        let err = Session::open(&args).err().unwrap();
        assert_eq!(err.code_str(), "REVIEW_CLI_STORE_ERROR");
    }
}
