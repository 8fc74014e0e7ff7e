//! Filtering and category extraction over cached records.
//!
//! Everything here is pure: the visible subset is derived from scratch
//! from the cache and the current criteria, so it is cheap enough to call
//! on every keystroke and can never go stale.

use serde::{Deserialize, Serialize};

use crate::domain::{ItemId, LibraryItem, MediaType, Question};

/// Category sentinel meaning "no category filter"
pub const ALL_CATEGORIES: &str = "All";

/// A record that can be listed, filtered and searched
pub trait Browsable {
    /// Top-level kind used by the tab strip
    type Kind: Copy + PartialEq;

    /// Whether the category filter only applies under a specific tab
    const CATEGORY_NEEDS_TAB: bool;

    fn id(&self) -> &ItemId;

    /// The record's kind, if it has one
    fn kind(&self) -> Option<Self::Kind>;

    fn category(&self) -> &str;

    /// Case-insensitive match against the searchable text fields.
    /// `term` is already lowercased.
    fn matches_term(&self, term: &str) -> bool;
}

fn contains_term(haystack: &str, term: &str) -> bool {
    haystack.to_lowercase().contains(term)
}

impl Browsable for LibraryItem {
    type Kind = MediaType;

    const CATEGORY_NEEDS_TAB: bool = true;

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn kind(&self) -> Option<MediaType> {
        Some(self.media_type)
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn matches_term(&self, term: &str) -> bool {
        [&self.title, &self.description, &self.author, &self.category]
            .iter()
            .any(|field| contains_term(field, term))
            || self.tags.iter().any(|tag| contains_term(tag, term))
    }
}

impl Browsable for Question {
    // Questions have no tab strip
    type Kind = ();

    const CATEGORY_NEEDS_TAB: bool = false;

    fn id(&self) -> &ItemId {
        &self.id
    }

    fn kind(&self) -> Option<()> {
        None
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn matches_term(&self, term: &str) -> bool {
        [&self.question, &self.answer, &self.category]
            .iter()
            .any(|field| contains_term(field, term))
            || self.tags.iter().any(|tag| contains_term(tag, term))
    }
}

/// Tab selection: everything, or a single kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab<K> {
    All,
    Only(K),
}

impl<K: Copy + PartialEq> Tab<K> {
    pub fn is_all(&self) -> bool {
        matches!(self, Tab::All)
    }

    fn admits(&self, kind: Option<K>) -> bool {
        match self {
            Tab::All => true,
            Tab::Only(wanted) => kind == Some(*wanted),
        }
    }
}

/// Current filter inputs for a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria<K> {
    pub tab: Tab<K>,

    /// Exact category name, or [`ALL_CATEGORIES`]
    pub category: String,

    /// Free-text search term (empty means no search)
    pub search: String,
}

impl<K> FilterCriteria<K> {
    /// Criteria that admit everything under the given tab
    pub fn new(tab: Tab<K>) -> Self {
        Self {
            tab,
            category: ALL_CATEGORIES.to_string(),
            search: String::new(),
        }
    }
}

impl<K> Default for FilterCriteria<K> {
    fn default() -> Self {
        Self::new(Tab::All)
    }
}

/// Whether one record passes all criteria
pub fn matches<T: Browsable>(item: &T, criteria: &FilterCriteria<T::Kind>) -> bool {
    if !criteria.tab.admits(item.kind()) {
        return false;
    }

    let category_applies = !T::CATEGORY_NEEDS_TAB || !criteria.tab.is_all();
    if category_applies && criteria.category != ALL_CATEGORIES && item.category() != criteria.category {
        return false;
    }

    if !criteria.search.is_empty() && !item.matches_term(&criteria.search.to_lowercase()) {
        return false;
    }

    true
}

/// Derive the visible subset, preserving the order of `items`
pub fn filter<T: Browsable + Clone>(items: &[T], criteria: &FilterCriteria<T::Kind>) -> Vec<T> {
    items
        .iter()
        .filter(|item| matches(*item, criteria))
        .cloned()
        .collect()
}

/// Category selector options for the records under a tab.
///
/// Returns "All" followed by the distinct non-empty categories in
/// first-seen order. Empty when the category filter does not apply
/// (library "all" tab).
pub fn category_options<T: Browsable>(items: &[T], tab: &Tab<T::Kind>) -> Vec<String> {
    if T::CATEGORY_NEEDS_TAB && tab.is_all() {
        return Vec::new();
    }

    let mut options = vec![ALL_CATEGORIES.to_string()];
    for item in items.iter().filter(|item| tab.admits(item.kind())) {
        let category = item.category();
        if !category.is_empty() && !options[1..].iter().any(|c| c == category) {
            options.push(category.to_string());
        }
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> Vec<LibraryItem> {
        vec![
            LibraryItem::new("a", MediaType::Book, "A").with_category("Fiqh"),
            LibraryItem::new("b", MediaType::Video, "B").with_category("Aqidah"),
            LibraryItem::new("c", MediaType::Book, "Purification")
                .with_category("Fiqh")
                .with_author("Ibn Qudamah")
                .with_tags(["taharah"]),
            LibraryItem::new("d", MediaType::Book, "Life of the Prophet").with_category("Seerah"),
            LibraryItem::new("e", MediaType::Book, "Untitled notes"),
        ]
    }

    fn ids<T: Browsable>(items: &[T]) -> Vec<&str> {
        items.iter().map(|i| i.id().as_str()).collect()
    }

    fn criteria(tab: Tab<MediaType>, category: &str, search: &str) -> FilterCriteria<MediaType> {
        FilterCriteria {
            tab,
            category: category.to_string(),
            search: search.to_string(),
        }
    }

    #[test]
    fn test_book_tab_keeps_only_books() {
        let items = vec![
            LibraryItem::new("a", MediaType::Book, "A").with_category("Fiqh"),
            LibraryItem::new("b", MediaType::Video, "B").with_category("Aqidah"),
        ];
        let tab = Tab::Only(MediaType::Book);

        let filtered = filter(&items, &FilterCriteria::new(tab));
        assert_eq!(ids(&filtered), vec!["a"]);
        assert_eq!(category_options(&items, &tab), vec!["All", "Fiqh"]);
    }

    #[test]
    fn test_search_matches_category_on_all_tab() {
        let items = vec![
            LibraryItem::new("a", MediaType::Book, "A").with_category("Fiqh"),
            LibraryItem::new("b", MediaType::Video, "B").with_category("Aqidah"),
        ];

        let filtered = filter(&items, &criteria(Tab::All, ALL_CATEGORIES, "aqid"));
        assert_eq!(ids(&filtered), vec!["b"]);
    }

    #[test]
    fn test_empty_criteria_is_identity() {
        let items = library();
        assert_eq!(filter(&items, &FilterCriteria::default()), items);
    }

    #[test]
    fn test_category_ignored_on_all_tab() {
        let items = library();
        let filtered = filter(&items, &criteria(Tab::All, "Seerah", ""));
        assert_eq!(filtered.len(), items.len());
    }

    #[test]
    fn test_category_is_case_sensitive() {
        let items = library();
        let tab = Tab::Only(MediaType::Book);
        assert_eq!(ids(&filter(&items, &criteria(tab, "Fiqh", ""))), vec!["a", "c"]);
        assert!(filter(&items, &criteria(tab, "fiqh", "")).is_empty());
    }

    #[test]
    fn test_search_fields() {
        let items = library();
        let by_author = filter(&items, &criteria(Tab::All, ALL_CATEGORIES, "QUDAMAH"));
        assert_eq!(ids(&by_author), vec!["c"]);

        let by_tag = filter(&items, &criteria(Tab::All, ALL_CATEGORIES, "tahar"));
        assert_eq!(ids(&by_tag), vec!["c"]);

        let by_title = filter(&items, &criteria(Tab::All, ALL_CATEGORIES, "prophet"));
        assert_eq!(ids(&by_title), vec!["d"]);
    }

    #[test]
    fn test_all_criteria_are_conjunctive() {
        let items = library();
        let filtered = filter(
            &items,
            &criteria(Tab::Only(MediaType::Book), "Fiqh", "purif"),
        );
        assert_eq!(ids(&filtered), vec!["c"]);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let items = library();
        let cases = [
            criteria(Tab::All, ALL_CATEGORIES, ""),
            criteria(Tab::Only(MediaType::Book), "Fiqh", ""),
            criteria(Tab::All, ALL_CATEGORIES, "a"),
            criteria(Tab::Only(MediaType::Video), ALL_CATEGORIES, "zzz"),
        ];

        for c in &cases {
            let once = filter(&items, c);
            assert_eq!(filter(&once, c), once);
        }
    }

    #[test]
    fn test_category_options_first_seen_order() {
        let items = library();
        assert_eq!(
            category_options(&items, &Tab::Only(MediaType::Book)),
            vec!["All", "Fiqh", "Seerah"]
        );
        assert!(category_options(&items, &Tab::All).is_empty());
    }

    #[test]
    fn test_question_category_applies_without_tab() {
        let questions = vec![
            Question::new("1", "What is Salah?", "Prayer").with_category("Fiqh"),
            Question::new("2", "Who are the prophets?", "Messengers").with_category("Aqidah"),
            Question::new("3", "Is fasting required?", "Yes").with_tags(["sawm"]),
        ];

        let c = FilterCriteria {
            tab: Tab::All,
            category: "Aqidah".to_string(),
            search: String::new(),
        };
        assert_eq!(ids(&filter(&questions, &c)), vec!["2"]);

        let c = FilterCriteria {
            tab: Tab::All,
            category: ALL_CATEGORIES.to_string(),
            search: "SAWM".to_string(),
        };
        assert_eq!(ids(&filter(&questions, &c)), vec!["3"]);

        assert_eq!(
            category_options(&questions, &Tab::All),
            vec!["All", "Fiqh", "Aqidah"]
        );
    }
}
