//! The Library view: tabbed, searchable, paginated grid of library items.

use std::sync::Arc;

use super::feed::{Feed, LoadOutcome};
use super::filter::{category_options, filter, Tab};
use super::paginate::{paginate, PAGE_STRIP_LEN};
use super::view_state::ViewState;
use super::EmptyState;
use crate::adapters::{PageQuery, RecordSource, Table};
use crate::domain::{LibraryItem, MediaType};

/// Columns the grid needs from `library_items`
pub const LIBRARY_COLUMNS: &[&str] = &[
    "id",
    "title",
    "description",
    "type",
    "author",
    "url",
    "thumbnail_url",
    "duration",
    "category",
    "tags",
    "view_count",
    "created_at",
    "updated_at",
];

/// Everything needed to draw one frame of the Library view
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryListing {
    pub tab: Tab<MediaType>,

    /// Category selector entries (empty when no selector is shown)
    pub categories: Vec<String>,
    pub selected_category: String,

    /// Items on the current page
    pub items: Vec<LibraryItem>,

    /// Size of the filtered set across all pages
    pub total_matches: usize,
    pub page: usize,
    pub total_pages: usize,
    pub page_numbers: Vec<usize>,
    pub has_prev: bool,
    pub has_next: bool,

    pub loading: bool,
    /// Show the "Load more" button
    pub can_load_more: bool,

    pub empty: Option<EmptyState>,
}

impl LibraryListing {
    /// "Showing 3 items"
    pub fn summary(&self) -> String {
        let noun = if self.total_matches == 1 { "item" } else { "items" };
        format!("Showing {} {}", self.total_matches, noun)
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        self.empty.map(|empty| match empty {
            EmptyState::NoItems => "The library has no items yet.",
            EmptyState::NoMatches => "No items found matching your search.",
        })
    }

    /// Whether the category selector is shown at all
    pub fn shows_categories(&self) -> bool {
        self.categories.len() > 1
    }
}

pub struct LibraryView {
    feed: Feed<LibraryItem>,
    state: ViewState<MediaType>,
    page_size: usize,
}

impl LibraryView {
    /// Create a view that fetches `fetch_page_size` records per backend
    /// page and shows `page_size` cards per screen. Opens on the Videos tab.
    pub fn new(source: Arc<dyn RecordSource>, fetch_page_size: usize, page_size: usize) -> Self {
        let query = PageQuery::newest_first(Table::LibraryItems, fetch_page_size)
            .with_columns(LIBRARY_COLUMNS);

        Self {
            feed: Feed::new(source, query),
            state: ViewState::new(Tab::Only(MediaType::Video)),
            page_size,
        }
    }

    /// Fresh mount: drop anything cached and fetch the first page
    pub async fn open(&self) -> LoadOutcome {
        self.feed.reload().await
    }

    pub async fn load_more(&self) -> LoadOutcome {
        self.feed.load_more().await
    }

    /// Navigate away; in-flight results will be ignored
    pub fn close(&self) {
        self.feed.close();
    }

    pub fn feed(&self) -> &Feed<LibraryItem> {
        &self.feed
    }

    pub fn state(&self) -> &ViewState<MediaType> {
        &self.state
    }

    pub fn select_tab(&mut self, tab: Tab<MediaType>) {
        self.state.set_tab(tab);
    }

    pub fn select_category(&mut self, category: impl Into<String>) {
        self.state.set_category(category);
    }

    pub fn search(&mut self, term: impl Into<String>) {
        self.state.set_search(term);
    }

    pub fn go_to_page(&mut self, page: usize) {
        let total_pages = self.render().total_pages;
        self.state.go_to_page(page, total_pages);
    }

    pub fn next_page(&mut self) {
        let total_pages = self.render().total_pages;
        self.state.next_page(total_pages);
    }

    pub fn prev_page(&mut self) {
        let total_pages = self.render().total_pages;
        self.state.prev_page(total_pages);
    }

    /// Derive the current frame from the cache and view state
    pub fn render(&self) -> LibraryListing {
        let criteria = self.state.criteria();
        let loading = self.feed.is_loading();

        self.feed.with_cache(|cache| {
            let filtered = filter(cache.items(), criteria);
            let window = paginate(&filtered, self.page_size, self.state.page());

            LibraryListing {
                tab: criteria.tab,
                categories: category_options(cache.items(), &criteria.tab),
                selected_category: criteria.category.clone(),
                items: window.items.to_vec(),
                total_matches: window.total_items,
                page: window.page,
                total_pages: window.total_pages,
                page_numbers: window.page_numbers(PAGE_STRIP_LEN).collect(),
                has_prev: window.has_prev(),
                has_next: window.has_next(),
                loading,
                can_load_more: cache.has_more() && !loading,
                empty: EmptyState::classify(cache.len(), filtered.len()),
            }
        })
    }
}
