//! Draft-aware children resolver
//!
//! Main entry point. Lists the children of a parent the way a reviewer
//! should see them:
//!
//! 1. Outside a review session, or under the trash container, the plain
//!    repository lookup is returned verbatim.
//! 2. Otherwise raw child references come from the parent's provider and
//!    each child is resolved to its project, draft or published version.
//! 3. Resolved versions that vanished or are logically expired are
//!    omitted. Published resolutions keep the listed reference.
//! 4. Surviving references are loaded and ordered by the ordering policy.
//!
//! Only argument validation is a hard error. Not-found conditions degrade
//! to omission; other storage failures propagate unchanged.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ReviewConfig;
use crate::content::{
    ChildEntry, ContentItem, ContentReference, LoaderOptions, PageWindow, VersionStatus,
};
use crate::observability::ResolutionScope;
use crate::review::{ReviewContext, ReviewContextAccessor};

use super::collaborators::{
    ChildrenSorter, CommonDraftStore, ContentRepository, ProjectOverlay, ProviderRegistry,
};
use super::errors::{recover_not_found, ResolverError, ResolverResult, StoreResult};
use super::expiry::ExpiryFilter;
use super::guard::ResolveGuard;
use super::ordering::OrderingPolicy;
use super::strategy::VersionSelector;

/// Why a listed child is missing from the output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OmissionReason {
    /// The resolved version no longer exists
    ResolvedVersionMissing,
    /// The resolved version is published past its stop-publish time
    Expired,
    /// The surviving reference failed to load
    LoadFailed,
}

impl OmissionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            OmissionReason::ResolvedVersionMissing => "resolved_version_missing",
            OmissionReason::Expired => "expired",
            OmissionReason::LoadFailed => "load_failed",
        }
    }
}

/// A child dropped from a review listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Omission {
    pub reference: ContentReference,
    pub reason: OmissionReason,
}

/// Full outcome of a children resolution.
#[derive(Clone, Debug)]
pub struct ChildrenResolution<T> {
    pub items: Vec<T>,
    pub omitted: Vec<Omission>,
    /// Whether the ordering policy re-sorted the items
    pub resorted: bool,
    /// Whether the plain repository lookup was returned
    pub passthrough: bool,
}

impl<T> ChildrenResolution<T> {
    fn passthrough(items: Vec<T>) -> Self {
        Self {
            items,
            omitted: Vec::new(),
            resorted: false,
            passthrough: true,
        }
    }
}

/// Resolves children of a parent under a review context.
///
/// Stateless: safe to share across threads and concurrent requests.
#[derive(Clone)]
pub struct DraftAwareChildrenResolver<T> {
    repository: Arc<dyn ContentRepository<T>>,
    providers: Arc<dyn ProviderRegistry>,
    selector: VersionSelector,
    ordering: OrderingPolicy,
    waste_basket: ContentReference,
}

impl<T: ContentItem> DraftAwareChildrenResolver<T> {
    pub fn new(
        repository: Arc<dyn ContentRepository<T>>,
        providers: Arc<dyn ProviderRegistry>,
        overlay: Arc<dyn ProjectOverlay>,
        drafts: Arc<dyn CommonDraftStore>,
    ) -> Self {
        let config = ReviewConfig::default();
        Self {
            repository,
            providers,
            selector: VersionSelector::new(overlay, drafts),
            ordering: OrderingPolicy::default(),
            waste_basket: config.waste_basket,
        }
    }

    /// Replaces the alphabetical name comparator.
    pub fn with_sorter(mut self, sorter: Arc<dyn ChildrenSorter>) -> Self {
        self.ordering = OrderingPolicy::new(sorter);
        self
    }

    pub fn with_config(mut self, config: &ReviewConfig) -> Self {
        self.waste_basket = config.waste_basket.clone();
        self
    }

    pub fn selector(&self) -> &VersionSelector {
        &self.selector
    }

    /// Children of `parent` as `context` should see them.
    pub fn children(
        &self,
        context: &ReviewContext,
        parent: &ContentReference,
        options: &LoaderOptions,
        window: PageWindow,
    ) -> ResolverResult<Vec<T>> {
        self.children_detailed(context, parent, options, window, &ResolveGuard::unbounded())
            .map(|resolution| resolution.items)
    }

    /// `children` with a deadline or cancellation token.
    pub fn children_with_guard(
        &self,
        context: &ReviewContext,
        parent: &ContentReference,
        options: &LoaderOptions,
        window: PageWindow,
        guard: &ResolveGuard,
    ) -> ResolverResult<Vec<T>> {
        self.children_detailed(context, parent, options, window, guard)
            .map(|resolution| resolution.items)
    }

    /// All children of `parent` in exactly `locale`.
    pub fn children_in_locale(
        &self,
        context: &ReviewContext,
        parent: &ContentReference,
        locale: &str,
    ) -> ResolverResult<Vec<T>> {
        self.children(context, parent, &LoaderOptions::specific(locale), PageWindow::ALL)
    }

    /// All children of `parent` under the host's ambient context, in its
    /// current language with fallback.
    pub fn children_default(
        &self,
        accessor: &dyn ReviewContextAccessor,
        parent: &ContentReference,
    ) -> ResolverResult<Vec<T>> {
        let context = accessor.active_review_context();
        let options = LoaderOptions::fallback(accessor.preferred_locale());
        self.children(&context, parent, &options, PageWindow::ALL)
    }

    /// Children of `parent` with the omissions and ordering decision.
    pub fn children_detailed(
        &self,
        context: &ReviewContext,
        parent: &ContentReference,
        options: &LoaderOptions,
        window: PageWindow,
        guard: &ResolveGuard,
    ) -> ResolverResult<ChildrenResolution<T>> {
        if parent.is_empty() {
            return Err(ResolverError::invalid_argument(
                "parent reference has no value set",
            ));
        }

        let scope = ResolutionScope::new("CHILDREN_RESOLVE", parent, context.session_id);
        match self.resolve_children(context, parent, options, window, guard) {
            Ok(resolution) => {
                scope.complete(resolution.items.len());
                Ok(resolution)
            }
            Err(e) => {
                scope.fail(e.code(), &e.to_string());
                Err(e)
            }
        }
    }

    fn resolve_children(
        &self,
        context: &ReviewContext,
        parent: &ContentReference,
        options: &LoaderOptions,
        window: PageWindow,
        guard: &ResolveGuard,
    ) -> ResolverResult<ChildrenResolution<T>> {
        if !context.is_active() {
            guard.checkpoint("plain_children")?;
            let items = self.repository.get_children(parent, options, window)?;
            return Ok(ChildrenResolution::passthrough(items));
        }

        let base = parent.without_version();
        if base == self.waste_basket {
            debug!(
                event = "TRASH_PASSTHROUGH",
                content = %parent,
                "trash children are not draft-resolved"
            );
            guard.checkpoint("plain_children")?;
            let items = self.repository.get_children(parent, options, window)?;
            return Ok(ChildrenResolution::passthrough(items));
        }
        let parent = base;

        guard.checkpoint("provider_lookup")?;
        let provider = self.providers.provider_for(&parent)?;

        guard.checkpoint("parent_load")?;
        let header = recover_not_found(self.repository.get_header(&parent, options))?.flatten();
        let locale = header.as_ref().and_then(|h| h.locale.clone());
        let sort_order = header.as_ref().and_then(|h| h.child_sort_order);

        guard.checkpoint("child_listing")?;
        let listed = match recover_not_found(provider.child_references(
            &parent,
            locale.as_deref(),
            T::accepted_kinds(),
            window,
        ))? {
            Some(listed) => listed,
            None => {
                debug!(
                    event = "CHILD_LISTING_NOT_FOUND",
                    content = %parent,
                    not_found = true,
                    "parent not found by provider, listing no children"
                );
                Vec::new()
            }
        };

        let mut omitted = Vec::new();
        let mut entries = Vec::with_capacity(listed.len());
        for child in listed {
            match self.resolve_child(context, child.content_link, options, guard)? {
                Ok(entry) => entries.push(entry),
                Err(omission) => omitted.push(omission),
            }
        }

        let mut items = Vec::with_capacity(entries.len());
        for entry in entries {
            guard.checkpoint("child_load")?;
            match load(self.repository.as_ref(), &entry.resolved, options)? {
                Some(item) => items.push(item),
                None => omitted.push(omit(entry.resolved, OmissionReason::LoadFailed)),
            }
        }

        let resorted = self
            .ordering
            .apply(&mut items, sort_order, window, locale.as_deref());
        debug!(
            event = "CHILDREN_ORDERED",
            content = %parent,
            count = items.len(),
            resorted,
            "ordering policy applied"
        );

        Ok(ChildrenResolution {
            items,
            omitted,
            resorted,
            passthrough: false,
        })
    }

    /// Picks the reference to load for one listed child.
    ///
    /// The inner `Err` is an omission, not a failure.
    fn resolve_child(
        &self,
        context: &ReviewContext,
        original: ContentReference,
        options: &LoaderOptions,
        guard: &ResolveGuard,
    ) -> ResolverResult<Result<ChildEntry, Omission>> {
        guard.checkpoint("version_select")?;
        let resolved = match self.selector.resolve(&original, context)?.into_reference() {
            Some(resolved) => resolved,
            None => return Ok(Ok(ChildEntry::unchanged(original))),
        };

        guard.checkpoint("resolved_load")?;
        let content = match load(self.repository.as_ref(), &resolved, options)? {
            Some(content) => content,
            None => {
                return Ok(Err(omit(resolved, OmissionReason::ResolvedVersionMissing)));
            }
        };

        let Some(state) = content.version_state() else {
            return Ok(Ok(ChildEntry { original, resolved }));
        };

        if ExpiryFilter::is_expired_now(&state) {
            return Ok(Err(omit(resolved, OmissionReason::Expired)));
        }

        if state.status == VersionStatus::Published {
            return Ok(Ok(ChildEntry::unchanged(original)));
        }

        Ok(Ok(ChildEntry {
            original,
            resolved: content.content_link().clone(),
        }))
    }
}

/// Loads `reference`, treating not-found as absence.
fn load<T>(
    repository: &dyn ContentRepository<T>,
    reference: &ContentReference,
    options: &LoaderOptions,
) -> StoreResult<Option<T>> {
    match recover_not_found(repository.get(reference, options)) {
        Ok(found) => Ok(found.flatten()),
        Err(e) => {
            warn!(
                event = "CONTENT_LOAD_FAILED",
                content = %reference,
                error = %e,
                "content load failed"
            );
            Err(e)
        }
    }
}

fn omit(reference: ContentReference, reason: OmissionReason) -> Omission {
    debug!(
        event = "CHILD_OMITTED",
        content = %reference,
        reason = reason.as_str(),
        "child omitted from review listing"
    );
    Omission { reference, reason }
}
