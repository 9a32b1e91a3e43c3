//! In-memory content store
//!
//! Implements every collaborator trait over a fixed node tree:
//! - `ContentRepository<ContentNode>` - published and versioned loads
//! - `ContentProvider` - child listings in insertion order
//! - `ProjectOverlay` - project version pins
//! - `CommonDraftStore` - common drafts, falling back to the published version
//!
//! Serves the default provider only. Used by the CLI and by tests.

mod fixture;

pub use fixture::{FixtureError, NodeRecord, ProjectRecord, StoreFixture, VersionRecord};

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::content::{
    ChildReference, ContentHeader, ContentItem, ContentKind, ContentReference, ContentVersion,
    LanguageSelection, LoaderOptions, PageWindow, VersionState, VersionStatus,
};
use crate::resolver::{
    CommonDraftStore, ContentProvider, ContentRepository, DraftAwareChildrenResolver,
    OrderingPolicy, ProjectOverlay, ProviderMap, StoreError, StoreResult,
};
use crate::review::ProjectId;

/// A loaded content node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentNode {
    pub content_link: ContentReference,
    pub name: String,
    pub kind: ContentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<VersionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_publish: Option<DateTime<Utc>>,
}

impl ContentItem for ContentNode {
    fn content_link(&self) -> &ContentReference {
        &self.content_link
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn version_state(&self) -> Option<VersionState> {
        self.status.map(|status| VersionState {
            status,
            stop_publish: self.stop_publish,
        })
    }
}

/// Immutable node tree with lookup counters.
#[derive(Debug)]
pub struct InMemoryContentStore {
    nodes: HashMap<u64, NodeRecord>,
    /// Child ids per parent, in fixture order
    children: HashMap<u64, Vec<u64>>,
    projects: HashMap<ProjectId, Vec<ContentReference>>,
    failing: HashSet<u64>,
    draft_lookups: AtomicUsize,
    overlay_lookups: AtomicUsize,
}

impl InMemoryContentStore {
    pub fn from_fixture(fixture: StoreFixture) -> Result<Self, FixtureError> {
        fixture.validate()?;

        let mut children: HashMap<u64, Vec<u64>> = HashMap::new();
        for node in &fixture.nodes {
            if let Some(parent) = node.parent {
                children.entry(parent).or_default().push(node.id);
            }
        }

        Ok(Self {
            nodes: fixture.nodes.into_iter().map(|n| (n.id, n)).collect(),
            children,
            projects: fixture
                .projects
                .into_iter()
                .map(|p| (p.id, p.items))
                .collect(),
            failing: HashSet::new(),
            draft_lookups: AtomicUsize::new(0),
            overlay_lookups: AtomicUsize::new(0),
        })
    }

    pub fn from_json(content: &str) -> Result<Self, FixtureError> {
        Self::from_fixture(serde_json::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, FixtureError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Makes every lookup touching node `id` fail with `Unavailable`.
    pub fn with_failure(mut self, id: u64) -> Self {
        self.failing.insert(id);
        self
    }

    /// Number of common-draft lookups served so far.
    pub fn draft_lookups(&self) -> usize {
        self.draft_lookups.load(Ordering::Relaxed)
    }

    /// Number of project overlay lookups served so far.
    pub fn overlay_lookups(&self) -> usize {
        self.overlay_lookups.load(Ordering::Relaxed)
    }

    /// Registry routing the default provider to this store.
    pub fn provider_map(self: &Arc<Self>) -> ProviderMap {
        ProviderMap::new(Arc::clone(self) as Arc<dyn ContentProvider>)
    }

    /// Resolver reading every collaborator from this store.
    pub fn resolver(self: &Arc<Self>) -> DraftAwareChildrenResolver<ContentNode> {
        DraftAwareChildrenResolver::new(
            Arc::clone(self) as Arc<dyn ContentRepository<ContentNode>>,
            Arc::new(self.provider_map()),
            Arc::clone(self) as Arc<dyn ProjectOverlay>,
            Arc::clone(self) as Arc<dyn CommonDraftStore>,
        )
    }

    fn node(&self, reference: &ContentReference) -> StoreResult<&NodeRecord> {
        if reference.provider().is_some() {
            return Err(StoreError::not_found(reference));
        }
        if self.failing.contains(&reference.id()) {
            return Err(StoreError::unavailable(format!(
                "content {} is unreachable",
                reference.id()
            )));
        }
        self.nodes
            .get(&reference.id())
            .ok_or_else(|| StoreError::not_found(reference))
    }

    /// Version a load of `reference` with `options` returns.
    fn select_version<'a>(
        node: &'a NodeRecord,
        reference: &ContentReference,
        options: &LoaderOptions,
    ) -> Option<&'a VersionRecord> {
        if let Some(work_id) = reference.work_id() {
            return node.versions.iter().find(|v| v.work_id == work_id);
        }

        let mut published = node
            .versions
            .iter()
            .filter(|v| v.status == VersionStatus::Published);

        match &options.language {
            LanguageSelection::Master => {
                let master = node.versions.first().and_then(|v| v.locale.as_deref());
                published.find(|v| v.locale.as_deref() == master || v.locale.is_none())
            }
            LanguageSelection::Specific(_) | LanguageSelection::Fallback(_) => {
                let published: Vec<_> = published.collect();
                options.candidate_locales().iter().find_map(|locale| {
                    published.iter().copied().find(|v| v.in_locale(locale))
                })
            }
        }
    }

    fn to_item(
        node: &NodeRecord,
        version: &VersionRecord,
        reference: &ContentReference,
    ) -> ContentNode {
        let content_link = match reference.work_id() {
            Some(work_id) => ContentReference::with_version(node.id, work_id),
            None => ContentReference::new(node.id),
        };

        ContentNode {
            content_link,
            name: version.name.clone(),
            kind: node.kind,
            locale: version.locale.clone(),
            status: node.versionable.then_some(version.status),
            stop_publish: if node.versionable {
                version.stop_publish
            } else {
                None
            },
        }
    }

    fn to_content_version(node: &NodeRecord, version: &VersionRecord) -> ContentVersion {
        ContentVersion {
            reference: ContentReference::with_version(node.id, version.work_id),
            status: version.status,
            start_publish: version.start_publish,
            stop_publish: version.stop_publish,
            locale: version.locale.clone(),
            name: version.name.clone(),
        }
    }
}

impl ContentRepository<ContentNode> for InMemoryContentStore {
    fn get(
        &self,
        reference: &ContentReference,
        options: &LoaderOptions,
    ) -> StoreResult<Option<ContentNode>> {
        let node = self.node(reference)?;
        Ok(Self::select_version(node, reference, options)
            .map(|version| Self::to_item(node, version, reference)))
    }

    fn get_children(
        &self,
        parent: &ContentReference,
        options: &LoaderOptions,
        window: PageWindow,
    ) -> StoreResult<Vec<ContentNode>> {
        let parent_node = self.node(parent)?;
        let listed = self.child_references(parent, None, None, window)?;

        let mut items = Vec::with_capacity(listed.len());
        for child in listed {
            match self.get(&child.content_link, options) {
                Ok(Some(item)) => items.push(item),
                Ok(None) => {}
                Err(e) if e.is_not_found() => {}
                Err(e) => return Err(e),
            }
        }

        let locale = options.candidate_locales().first().map(String::as_str);
        OrderingPolicy::default().apply(&mut items, parent_node.child_sort_order, window, locale);
        Ok(items)
    }

    fn get_header(
        &self,
        reference: &ContentReference,
        options: &LoaderOptions,
    ) -> StoreResult<Option<ContentHeader>> {
        let node = self.node(reference)?;
        let locale = Self::select_version(node, reference, options).and_then(|v| v.locale.clone());

        Ok(Some(ContentHeader {
            reference: reference.clone(),
            locale,
            child_sort_order: node.child_sort_order,
        }))
    }
}

impl ContentProvider for InMemoryContentStore {
    fn child_references(
        &self,
        parent: &ContentReference,
        locale: Option<&str>,
        kinds: Option<&[ContentKind]>,
        window: PageWindow,
    ) -> StoreResult<Vec<ChildReference>> {
        self.node(parent)?;

        let ids = self
            .children
            .get(&parent.id())
            .map(Vec::as_slice)
            .unwrap_or_default();

        let matching = ids
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .filter(|node| kinds.map_or(true, |kinds| kinds.contains(&node.kind)))
            .filter(|node| {
                locale.map_or(true, |locale| node.versions.iter().any(|v| v.in_locale(locale)))
            })
            .map(|node| ChildReference::new(ContentReference::new(node.id), node.kind));

        Ok(window.apply(matching).collect())
    }
}

impl ProjectOverlay for InMemoryContentStore {
    fn project_reference(
        &self,
        base: &ContentReference,
        project_id: ProjectId,
        locale: &str,
    ) -> StoreResult<Option<ContentReference>> {
        self.overlay_lookups.fetch_add(1, Ordering::Relaxed);

        let pins = self
            .projects
            .get(&project_id)
            .ok_or_else(|| StoreError::not_found(format!("project {}", project_id)))?;
        let node = self.node(base)?;

        let pinned = pins
            .iter()
            .filter(|pin| pin.same_identity(base))
            .find(|pin| {
                node.versions
                    .iter()
                    .any(|v| Some(v.work_id) == pin.work_id() && v.in_locale(locale))
            })
            .cloned();

        Ok(pinned)
    }
}

impl CommonDraftStore for InMemoryContentStore {
    fn load_common_draft(
        &self,
        base: &ContentReference,
        locale: &str,
    ) -> StoreResult<ContentVersion> {
        self.draft_lookups.fetch_add(1, Ordering::Relaxed);

        let node = self.node(base)?;
        let in_locale = || node.versions.iter().filter(|v| v.in_locale(locale));

        in_locale()
            .find(|v| v.common_draft)
            .or_else(|| in_locale().find(|v| v.status == VersionStatus::Published))
            .map(|version| Self::to_content_version(node, version))
            .ok_or_else(|| StoreError::not_found(format!("common draft of {} in {}", base, locale)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "nodes": [
            {"id": 1, "child_sort_order": "alphabetical",
             "versions": [{"work_id": 10, "name": "Home", "locale": "en", "status": "published"}]},
            {"id": 5, "parent": 1,
             "versions": [
                {"work_id": 50, "name": "News", "locale": "en", "status": "published"},
                {"work_id": 51, "name": "News draft", "locale": "en", "status": "checked_in", "common_draft": true},
                {"work_id": 52, "name": "Nyheter", "locale": "sv", "status": "published"}
             ]},
            {"id": 6, "parent": 1, "kind": "folder", "versionable": false,
             "versions": [{"work_id": 60, "name": "Assets", "status": "published"}]},
            {"id": 7, "parent": 1,
             "versions": [{"work_id": 70, "name": "Only Swedish", "locale": "sv", "status": "published"}]}
        ],
        "projects": [{"id": 3, "items": [{"id": 5, "work_id": 51}]}]
    }"#;

    fn store() -> InMemoryContentStore {
        InMemoryContentStore::from_json(FIXTURE).unwrap()
    }

    #[test]
    fn test_published_load_honours_locale() {
        let store = store();
        let en = store
            .get(&ContentReference::new(5), &LoaderOptions::specific("en"))
            .unwrap()
            .unwrap();
        assert_eq!(en.name, "News");
        assert_eq!(en.content_link, ContentReference::new(5));

        let fallback = store
            .get(
                &ContentReference::new(7),
                &LoaderOptions::fallback_chain(vec!["en".into(), "sv".into()]),
            )
            .unwrap()
            .unwrap();
        assert_eq!(fallback.name, "Only Swedish");

        assert!(store
            .get(&ContentReference::new(7), &LoaderOptions::specific("en"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_versioned_load_returns_exact_version() {
        let store = store();
        let draft = store
            .get(&ContentReference::with_version(5, 51), &LoaderOptions::specific("en"))
            .unwrap()
            .unwrap();
        assert_eq!(draft.name, "News draft");
        assert_eq!(draft.content_link, ContentReference::with_version(5, 51));
        assert_eq!(draft.status, Some(VersionStatus::CheckedIn));
    }

    #[test]
    fn test_unknown_node_is_not_found() {
        let err = store()
            .get(&ContentReference::new(99), &LoaderOptions::default())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_non_versionable_node_has_no_state() {
        let folder = store()
            .get(&ContentReference::new(6), &LoaderOptions::specific("en"))
            .unwrap()
            .unwrap();
        assert_eq!(folder.version_state(), None);
    }

    #[test]
    fn test_child_listing_filters() {
        let store = store();
        let parent = ContentReference::new(1);

        let all = store
            .child_references(&parent, None, None, PageWindow::ALL)
            .unwrap();
        assert_eq!(all.len(), 3);

        let en = store
            .child_references(&parent, Some("en"), None, PageWindow::ALL)
            .unwrap();
        let ids: Vec<u64> = en.iter().map(|c| c.content_link.id()).collect();
        assert_eq!(ids, vec![5, 6]);

        let pages = store
            .child_references(&parent, None, Some(&[ContentKind::Page][..]), PageWindow::ALL)
            .unwrap();
        assert!(pages.iter().all(|c| c.kind == ContentKind::Page));

        let window = store
            .child_references(&parent, None, None, PageWindow::new(1, 1))
            .unwrap();
        assert_eq!(window[0].content_link, ContentReference::new(6));
    }

    #[test]
    fn test_common_draft_prefers_flagged_version() {
        let store = store();
        let draft = store
            .load_common_draft(&ContentReference::new(5), "en")
            .unwrap();
        assert_eq!(draft.reference, ContentReference::with_version(5, 51));
        assert_eq!(store.draft_lookups(), 1);

        // No flagged draft in Swedish: the published version is the common draft
        let sv = store
            .load_common_draft(&ContentReference::new(5), "sv")
            .unwrap();
        assert_eq!(sv.status, VersionStatus::Published);

        let missing = store
            .load_common_draft(&ContentReference::new(7), "en")
            .unwrap_err();
        assert!(missing.is_not_found());
    }

    #[test]
    fn test_project_pins_respect_locale() {
        let store = store();
        assert_eq!(
            store
                .project_reference(&ContentReference::new(5), 3, "en")
                .unwrap(),
            Some(ContentReference::with_version(5, 51))
        );
        assert_eq!(
            store
                .project_reference(&ContentReference::new(5), 3, "sv")
                .unwrap(),
            None
        );
        assert!(store
            .project_reference(&ContentReference::new(5), 9, "en")
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_failure_injection() {
        let store = store().with_failure(5);
        let err = store
            .get(&ContentReference::new(5), &LoaderOptions::default())
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn test_fixture_validation() {
        let duplicate = r#"{"nodes": [
            {"id": 1, "versions": []},
            {"id": 1, "versions": []}
        ]}"#;
        assert!(matches!(
            InMemoryContentStore::from_json(duplicate),
            Err(FixtureError::Invalid(_))
        ));

        let orphan = r#"{"nodes": [{"id": 4, "parent": 8, "versions": []}]}"#;
        assert!(matches!(
            InMemoryContentStore::from_json(orphan),
            Err(FixtureError::Invalid(_))
        ));

        let unversioned_pin = r#"{"nodes": [{"id": 4, "versions": []}],
            "projects": [{"id": 1, "items": [{"id": 4}]}]}"#;
        assert!(matches!(
            InMemoryContentStore::from_json(unversioned_pin),
            Err(FixtureError::Invalid(_))
        ));
    }
}
