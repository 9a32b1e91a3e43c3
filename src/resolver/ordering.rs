//! Ordering policy for resolved children
//!
//! Alphabetical re-sorting is applied only to complete result sets. A
//! deliberately paginated window keeps provider order so it stays
//! consistent with adjacent pages.

use std::cmp::Ordering;
use std::sync::Arc;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::content::{ChildSortOrder, ContentItem, PageWindow};

use super::collaborators::ChildrenSorter;

/// Decides whether and how to re-sort a resolved child list.
#[derive(Clone)]
pub struct OrderingPolicy {
    sorter: Arc<dyn ChildrenSorter>,
}

impl Default for OrderingPolicy {
    fn default() -> Self {
        Self::new(Arc::new(AlphabeticalSorter))
    }
}

impl OrderingPolicy {
    pub fn new(sorter: Arc<dyn ChildrenSorter>) -> Self {
        Self { sorter }
    }

    /// True if a list of `count` items fetched through `window` may be
    /// re-sorted for a parent ordered by `sort_order`.
    pub fn should_resort(
        sort_order: Option<ChildSortOrder>,
        window: PageWindow,
        count: usize,
    ) -> bool {
        if count == 0 || sort_order != Some(ChildSortOrder::Alphabetical) {
            return false;
        }

        window.is_unbounded()
            || (window.start_index == Some(0) && window.max_rows.is_some_and(|max| count < max))
    }

    /// Applies the policy in place. Returns whether the list was re-sorted.
    ///
    /// Sorting is stable.
    pub fn apply<T: ContentItem>(
        &self,
        items: &mut [T],
        sort_order: Option<ChildSortOrder>,
        window: PageWindow,
        locale: Option<&str>,
    ) -> bool {
        if !Self::should_resort(sort_order, window, items.len()) {
            return false;
        }

        items.sort_by(|a, b| self.sorter.compare_names(a.name(), b.name(), locale));
        true
    }
}

/// Locale-aware alphabetical comparator.
///
/// Names are compared on a folded key: compatibility decomposition,
/// combining marks dropped, lowercased. Nordic locales keep å, ä, æ, ö
/// and ø as separate letters after `z`. Equal keys fall back to the raw
/// names so the order is total.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlphabeticalSorter;

impl AlphabeticalSorter {
    /// Collation key for `name` under `locale`.
    pub fn sort_key(name: &str, locale: Option<&str>) -> Vec<u32> {
        let nordic = locale.is_some_and(is_nordic);
        let mut key = Vec::with_capacity(name.len());

        for c in name.chars() {
            if nordic {
                if let Some(weight) = nordic_weight(c) {
                    key.push(weight);
                    continue;
                }
            }
            for folded in std::iter::once(c).nfkd().filter(|d| !is_combining_mark(*d)) {
                key.extend(folded.to_lowercase().map(u32::from));
            }
        }

        key
    }
}

impl ChildrenSorter for AlphabeticalSorter {
    fn compare_names(&self, a: &str, b: &str, locale: Option<&str>) -> Ordering {
        Self::sort_key(a, locale)
            .cmp(&Self::sort_key(b, locale))
            .then_with(|| a.cmp(b))
    }
}

fn is_nordic(locale: &str) -> bool {
    let language = locale.split(['-', '_']).next().unwrap_or(locale);
    matches!(
        language.to_ascii_lowercase().as_str(),
        "sv" | "fi" | "nb" | "nn" | "no" | "da"
    )
}

// Weights just past 'z' (0x7a).
fn nordic_weight(c: char) -> Option<u32> {
    match c {
        'å' | 'Å' => Some(0x7b),
        'ä' | 'Ä' | 'æ' | 'Æ' => Some(0x7c),
        'ö' | 'Ö' | 'ø' | 'Ø' => Some(0x7d),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentReference;

    #[derive(Clone, Debug)]
    struct Named(ContentReference, String);

    impl ContentItem for Named {
        fn content_link(&self) -> &ContentReference {
            &self.0
        }

        fn name(&self) -> &str {
            &self.1
        }
    }

    fn named(names: &[&str]) -> Vec<Named> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| Named(ContentReference::new(i as u64 + 1), n.to_string()))
            .collect()
    }

    fn names(items: &[Named]) -> Vec<&str> {
        items.iter().map(|i| i.1.as_str()).collect()
    }

    #[test]
    fn test_resort_unbounded_alphabetical() {
        assert!(OrderingPolicy::should_resort(
            Some(ChildSortOrder::Alphabetical),
            PageWindow::ALL,
            5
        ));
    }

    #[test]
    fn test_no_resort_for_other_orders() {
        for order in [None, Some(ChildSortOrder::Index), Some(ChildSortOrder::CreatedDescending)] {
            assert!(!OrderingPolicy::should_resort(order, PageWindow::ALL, 5));
        }
    }

    #[test]
    fn test_no_resort_for_empty_list() {
        assert!(!OrderingPolicy::should_resort(
            Some(ChildSortOrder::Alphabetical),
            PageWindow::ALL,
            0
        ));
    }

    #[test]
    fn test_pagination_guard() {
        let alpha = Some(ChildSortOrder::Alphabetical);

        // Full page: may be one window of many
        assert!(!OrderingPolicy::should_resort(alpha, PageWindow::new(0, 3), 3));
        // Short first page: the whole set
        assert!(OrderingPolicy::should_resort(alpha, PageWindow::new(0, 10), 3));
        // Later page: never re-sorted
        assert!(!OrderingPolicy::should_resort(alpha, PageWindow::new(5, 10), 3));
        // Half-bounded windows do not count as unbounded
        assert!(!OrderingPolicy::should_resort(alpha, PageWindow::from_raw(-1, 10), 3));
        assert!(!OrderingPolicy::should_resort(alpha, PageWindow::from_raw(0, -1), 3));
    }

    #[test]
    fn test_apply_sorts_and_reports() {
        let policy = OrderingPolicy::default();
        let mut items = named(&["charlie", "Alice", "bob"]);

        let resorted = policy.apply(
            &mut items,
            Some(ChildSortOrder::Alphabetical),
            PageWindow::ALL,
            Some("en"),
        );

        assert!(resorted);
        assert_eq!(names(&items), vec!["Alice", "bob", "charlie"]);
    }

    #[test]
    fn test_apply_keeps_provider_order() {
        let policy = OrderingPolicy::default();
        let mut items = named(&["charlie", "Alice", "bob"]);

        let resorted = policy.apply(&mut items, Some(ChildSortOrder::Index), PageWindow::ALL, None);

        assert!(!resorted);
        assert_eq!(names(&items), vec!["charlie", "Alice", "bob"]);
    }

    #[test]
    fn test_sorter_ignores_accents_by_default() {
        let sorter = AlphabeticalSorter;
        assert_eq!(sorter.compare_names("école", "ecole", Some("fr")), Ordering::Greater);
        assert_eq!(sorter.compare_names("école", "ecolf", Some("fr")), Ordering::Less);
        assert_eq!(sorter.compare_names("Zebra", "apple", Some("en")), Ordering::Greater);
    }

    #[test]
    fn test_sorter_nordic_tailoring() {
        let sorter = AlphabeticalSorter;
        // Swedish: ö after z
        assert_eq!(sorter.compare_names("Örebro", "Zürich", Some("sv-SE")), Ordering::Greater);
        // Elsewhere ö folds to o
        assert_eq!(sorter.compare_names("Örebro", "Zürich", Some("en")), Ordering::Less);
        assert_eq!(sorter.compare_names("Ärla", "Åre", Some("sv")), Ordering::Greater);
    }

    #[test]
    fn test_sort_is_stable_for_identical_names() {
        let policy = OrderingPolicy::default();
        let mut items = named(&["same", "same", "alpha"]);
        policy.apply(&mut items, Some(ChildSortOrder::Alphabetical), PageWindow::ALL, None);

        assert_eq!(items[0].1, "alpha");
        assert_eq!(items[1].0, ContentReference::new(1));
        assert_eq!(items[2].0, ContentReference::new(2));
    }
}
