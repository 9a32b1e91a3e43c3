//! Version resolution strategy selector
//!
//! Decides which version of a node a reviewer sees:
//! 1. In a project review, the version pinned to that project (if any).
//!    The common-draft store is not consulted on this path.
//! 2. Otherwise the common draft in the preferred locale.
//! 3. Otherwise no override: the caller keeps the published reference.

use std::sync::Arc;

use tracing::debug;

use crate::content::ContentReference;
use crate::review::ReviewContext;

use super::collaborators::{CommonDraftStore, ProjectOverlay};
use super::errors::{recover_not_found, ResolverResult};

/// Why no override applies to a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoOverrideReason {
    /// The project does not pin a version of this node
    ProjectNotPinned,
    /// The project overlay lookup reported the node as missing
    ProjectNotFound,
    /// The node has no common draft in the preferred locale
    NoCommonDraft,
}

impl NoOverrideReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoOverrideReason::ProjectNotPinned => "project_not_pinned",
            NoOverrideReason::ProjectNotFound => "project_not_found",
            NoOverrideReason::NoCommonDraft => "no_common_draft",
        }
    }
}

/// Outcome of version selection for one node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VersionOverride {
    /// Version pinned by the active project
    Project(ContentReference),
    /// Common draft pending approval
    Draft(ContentReference),
    /// Keep the original reference
    None(NoOverrideReason),
}

impl VersionOverride {
    /// The reference to load instead of the original, if any.
    pub fn into_reference(self) -> Option<ContentReference> {
        match self {
            VersionOverride::Project(r) | VersionOverride::Draft(r) => Some(r),
            VersionOverride::None(_) => None,
        }
    }

    pub fn is_override(&self) -> bool {
        !matches!(self, VersionOverride::None(_))
    }
}

/// Selects project, draft or published versions.
#[derive(Clone)]
pub struct VersionSelector {
    overlay: Arc<dyn ProjectOverlay>,
    drafts: Arc<dyn CommonDraftStore>,
}

impl VersionSelector {
    pub fn new(overlay: Arc<dyn ProjectOverlay>, drafts: Arc<dyn CommonDraftStore>) -> Self {
        Self { overlay, drafts }
    }

    /// Resolves the version of `base` to show under `context`.
    ///
    /// Not-found lookups become `VersionOverride::None`; other collaborator
    /// failures propagate.
    pub fn resolve(
        &self,
        base: &ContentReference,
        context: &ReviewContext,
    ) -> ResolverResult<VersionOverride> {
        let locale = context.preferred_locale.as_str();

        if let Some(project_id) = context.project_id {
            let pinned =
                recover_not_found(self.overlay.project_reference(base, project_id, locale))?;

            return Ok(match pinned {
                Some(Some(reference)) => VersionOverride::Project(reference),
                Some(None) => {
                    debug!(
                        event = "PROJECT_VERSION_NOT_PINNED",
                        content = %base,
                        project_id,
                        locale,
                        "project has no version of content, using published"
                    );
                    VersionOverride::None(NoOverrideReason::ProjectNotPinned)
                }
                None => {
                    debug!(
                        event = "PROJECT_VERSION_NOT_FOUND",
                        content = %base,
                        project_id,
                        locale,
                        not_found = true,
                        "project overlay lookup found no content, using published"
                    );
                    VersionOverride::None(NoOverrideReason::ProjectNotFound)
                }
            });
        }

        match recover_not_found(self.drafts.load_common_draft(base, locale))? {
            Some(draft) => Ok(VersionOverride::Draft(draft.reference)),
            None => {
                debug!(
                    event = "COMMON_DRAFT_NOT_FOUND",
                    content = %base,
                    locale,
                    not_found = true,
                    "no common draft, using published"
                );
                Ok(VersionOverride::None(NoOverrideReason::NoCommonDraft))
            }
        }
    }

    /// Reference of the unpublished version to show, or `None` for the
    /// original reference.
    pub fn load_unpublished_version(
        &self,
        base: &ContentReference,
        context: &ReviewContext,
    ) -> ResolverResult<Option<ContentReference>> {
        Ok(self.resolve(base, context)?.into_reference())
    }
}
