//! Listing views over backend tables.
//!
//! # Data flow
//!
//! ```text
//! RecordSource ──fetch_page──▶ Feed/ItemCache (append-only)
//!                                   │
//!                     ViewState ──▶ filter ──▶ paginate ──▶ Listing
//! ```
//!
//! The cache is the only stateful piece. The filtered subset, category
//! options and page window are recomputed from scratch on every render.

pub mod cache;
pub mod feed;
pub mod filter;
pub mod library;
pub mod paginate;
pub mod questions;
pub mod view_state;

use serde::{Deserialize, Serialize};

pub use cache::ItemCache;
pub use feed::{Feed, LoadOutcome};
pub use filter::{category_options, filter, Browsable, FilterCriteria, Tab, ALL_CATEGORIES};
pub use library::{LibraryListing, LibraryView};
pub use paginate::{paginate, PageWindow, LIBRARY_PAGE_SIZE};
pub use questions::{QuestionsListing, QuestionsView};
pub use view_state::ViewState;

/// Why a listing has nothing to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    /// Nothing has been loaded at all
    NoItems,

    /// Records exist but none pass the current filters
    NoMatches,
}

impl EmptyState {
    /// Classify a listing from its cache size and filtered size
    pub fn classify(cached: usize, visible: usize) -> Option<Self> {
        match (cached, visible) {
            (0, _) => Some(EmptyState::NoItems),
            (_, 0) => Some(EmptyState::NoMatches),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_state_classification() {
        assert_eq!(EmptyState::classify(0, 0), Some(EmptyState::NoItems));
        assert_eq!(EmptyState::classify(5, 0), Some(EmptyState::NoMatches));
        assert_eq!(EmptyState::classify(5, 2), None);
    }
}
