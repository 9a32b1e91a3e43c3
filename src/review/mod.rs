//! Review Context
//!
//! Request-scoped state describing whether a reviewer is browsing content
//! for approval. Owned by the surrounding session machinery; the resolver
//! only reads it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a review project.
pub type ProjectId = u32;

/// Review session state threaded through every resolution call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewContext {
    /// Whether a review session is in progress
    pub active: bool,
    /// Project whose version pins take precedence over common drafts
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    /// Locale used for draft and project lookups
    pub preferred_locale: String,
    /// Correlation id for logs
    #[serde(default = "Uuid::new_v4")]
    pub session_id: Uuid,
}

impl ReviewContext {
    /// Context of a normal site visitor. Resolution is a pass-through.
    pub fn inactive(preferred_locale: impl Into<String>) -> Self {
        Self {
            active: false,
            project_id: None,
            preferred_locale: preferred_locale.into(),
            session_id: Uuid::new_v4(),
        }
    }

    /// Review session showing common drafts.
    pub fn reviewing(preferred_locale: impl Into<String>) -> Self {
        Self {
            active: true,
            ..Self::inactive(preferred_locale)
        }
    }

    /// Review session scoped to a project.
    pub fn for_project(project_id: ProjectId, preferred_locale: impl Into<String>) -> Self {
        Self {
            project_id: Some(project_id),
            ..Self::reviewing(preferred_locale)
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Access to the ambient review context of a host environment.
pub trait ReviewContextAccessor: Send + Sync {
    /// Context of the current request.
    fn active_review_context(&self) -> ReviewContext;

    /// Language of the current request.
    fn preferred_locale(&self) -> String;
}

/// Accessor returning a fixed context.
#[derive(Debug, Clone)]
pub struct StaticReviewContext {
    context: ReviewContext,
}

impl StaticReviewContext {
    pub fn new(context: ReviewContext) -> Self {
        Self { context }
    }
}

impl ReviewContextAccessor for StaticReviewContext {
    fn active_review_context(&self) -> ReviewContext {
        self.context.clone()
    }

    fn preferred_locale(&self) -> String {
        self.context.preferred_locale.clone()
    }
}
