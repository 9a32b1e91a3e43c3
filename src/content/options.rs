//! Loader options and pagination windows
//!
//! Both are passed through unchanged to the content repository.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How the repository picks the language branch of a localizable node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "locales", rename_all = "snake_case")]
pub enum LanguageSelection {
    /// Exactly this locale, nothing else
    Specific(String),
    /// First locale of the chain the node exists in
    Fallback(Vec<String>),
    /// The node's master (first created) language branch
    Master,
}

/// Configuration bag for content loads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderOptions {
    pub language: LanguageSelection,
    /// Opaque hints forwarded to the repository
    #[serde(default)]
    pub hints: BTreeMap<String, String>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            language: LanguageSelection::Master,
            hints: BTreeMap::new(),
        }
    }
}

impl LoaderOptions {
    /// Load exactly `locale`.
    pub fn specific(locale: impl Into<String>) -> Self {
        Self {
            language: LanguageSelection::Specific(locale.into()),
            ..Self::default()
        }
    }

    /// Load `locale`, falling back along the chain.
    ///
    /// This is the default list option for children lookups.
    pub fn fallback(locale: impl Into<String>) -> Self {
        Self::fallback_chain(vec![locale.into()])
    }

    pub fn fallback_chain(chain: Vec<String>) -> Self {
        Self {
            language: LanguageSelection::Fallback(chain),
            ..Self::default()
        }
    }

    pub fn with_hint(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.hints.insert(key.into(), value.into());
        self
    }

    /// Locales to try, in order. Empty for master-language loads.
    pub fn candidate_locales(&self) -> &[String] {
        match &self.language {
            LanguageSelection::Specific(locale) => std::slice::from_ref(locale),
            LanguageSelection::Fallback(chain) => chain,
            LanguageSelection::Master => &[],
        }
    }
}

/// A `[start_index, max_rows)` window over a child listing.
///
/// `None` on either side is the unbounded marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    pub start_index: Option<usize>,
    pub max_rows: Option<usize>,
}

impl PageWindow {
    /// No pagination.
    pub const ALL: PageWindow = PageWindow {
        start_index: None,
        max_rows: None,
    };

    pub fn new(start_index: usize, max_rows: usize) -> Self {
        Self {
            start_index: Some(start_index),
            max_rows: Some(max_rows),
        }
    }

    /// Builds a window from the `-1`-means-unbounded convention.
    pub fn from_raw(start_index: i32, max_rows: i32) -> Self {
        Self {
            start_index: usize::try_from(start_index).ok(),
            max_rows: usize::try_from(max_rows).ok(),
        }
    }

    /// True if neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.start_index.is_none() && self.max_rows.is_none()
    }

    /// Applies the window to an iterator.
    pub fn apply<I: Iterator>(&self, items: I) -> impl Iterator<Item = I::Item> {
        items
            .skip(self.start_index.unwrap_or(0))
            .take(self.max_rows.unwrap_or(usize::MAX))
    }
}
