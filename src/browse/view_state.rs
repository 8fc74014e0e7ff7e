//! Serializable per-view selection state.
//!
//! Holds what the user picked (tab, category, search term, page) in one
//! record that the pure filter and paginate functions take as input.
//! Mutations go through setters so that any change to a filter input
//! sends the view back to page 1.

use serde::{Deserialize, Serialize};

use super::filter::{FilterCriteria, Tab, ALL_CATEGORIES};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState<K> {
    criteria: FilterCriteria<K>,
    /// Requested display page (1-based)
    page: usize,
}

impl<K: Copy + PartialEq> ViewState<K> {
    pub fn new(tab: Tab<K>) -> Self {
        Self {
            criteria: FilterCriteria::new(tab),
            page: 1,
        }
    }

    pub fn criteria(&self) -> &FilterCriteria<K> {
        &self.criteria
    }

    pub fn tab(&self) -> Tab<K> {
        self.criteria.tab
    }

    pub fn category(&self) -> &str {
        &self.criteria.category
    }

    pub fn search(&self) -> &str {
        &self.criteria.search
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Switch tabs. Also clears the category, which belongs to the old tab.
    pub fn set_tab(&mut self, tab: Tab<K>) {
        if self.criteria.tab != tab {
            self.criteria.tab = tab;
            self.criteria.category = ALL_CATEGORIES.to_string();
            self.page = 1;
        }
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        let category = category.into();
        if self.criteria.category != category {
            self.criteria.category = category;
            self.page = 1;
        }
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        let search = search.into();
        if self.criteria.search != search {
            self.criteria.search = search;
            self.page = 1;
        }
    }

    /// Jump to `page`, clamped into `1..=total_pages`
    pub fn go_to_page(&mut self, page: usize, total_pages: usize) {
        self.page = page.clamp(1, total_pages.max(1));
    }

    /// Step forward, never past `total_pages`
    pub fn next_page(&mut self, total_pages: usize) {
        self.go_to_page(self.page.saturating_add(1), total_pages);
    }

    /// Step back from the page actually shown, not a stale request
    pub fn prev_page(&mut self, total_pages: usize) {
        let shown = self.page.clamp(1, total_pages.max(1));
        self.page = shown.saturating_sub(1).max(1);
    }
}

impl<K: Copy + PartialEq> Default for ViewState<K> {
    fn default() -> Self {
        Self::new(Tab::All)
    }
}
