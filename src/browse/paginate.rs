//! Display pagination over a filtered listing.
//!
//! This is independent of backend paging: the cache grows in fetch-sized
//! pages, while the screen shows fixed-size windows over the filtered set.

use std::ops::RangeInclusive;

/// Cards per screen in the library grid
pub const LIBRARY_PAGE_SIZE: usize = 12;

/// Page-number buttons shown in the pager strip
pub const PAGE_STRIP_LEN: usize = 5;

/// One screen of a paginated listing
#[derive(Debug, Clone, PartialEq)]
pub struct PageWindow<'a, T> {
    /// Records on this page
    pub items: &'a [T],

    /// 1-based page actually shown (requested page clamped into range)
    pub page: usize,

    /// Always at least 1, even for an empty listing
    pub total_pages: usize,

    /// Size of the whole filtered set
    pub total_items: usize,
}

impl<T> PageWindow<'_, T> {
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Page numbers for the pager strip (the first few pages)
    pub fn page_numbers(&self, max_buttons: usize) -> RangeInclusive<usize> {
        1..=self.total_pages.min(max_buttons.max(1))
    }
}

/// Slice `items` into the window for `requested_page` (1-based).
///
/// Out-of-range requests are clamped, so a stale page index never yields
/// an empty window over a non-empty set. A zero page size is treated as 1.
pub fn paginate<T>(items: &[T], page_size: usize, requested_page: usize) -> PageWindow<'_, T> {
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size).max(1);
    let page = requested_page.clamp(1, total_pages);

    let start = (page - 1) * page_size;
    let end = (start + page_size).min(items.len());

    PageWindow {
        items: &items[start.min(end)..end],
        page,
        total_pages,
        total_items: items.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_partial_page() {
        let items: Vec<usize> = (0..25).collect();
        let window = paginate(&items, 12, 3);

        assert_eq!(window.total_pages, 3);
        assert_eq!(window.page, 3);
        assert_eq!(window.items, &[24usize]);
        assert!(window.has_prev());
        assert!(!window.has_next());
    }

    #[test]
    fn test_requested_page_clamped() {
        let items: Vec<usize> = (0..13).collect();

        let window = paginate(&items, 12, 9);
        assert_eq!(window.page, 2);
        assert_eq!(window.items, &[12usize]);

        let window = paginate(&items, 12, 0);
        assert_eq!(window.page, 1);
        assert_eq!(window.items.len(), 12);
    }

    #[test]
    fn test_empty_listing_has_one_empty_page() {
        let items: Vec<usize> = Vec::new();
        let window = paginate(&items, 12, 4);

        assert_eq!(window.total_pages, 1);
        assert_eq!(window.page, 1);
        assert!(window.items.is_empty());
        assert!(!window.has_prev());
        assert!(!window.has_next());
    }

    #[test]
    fn test_bounds_hold_for_many_shapes() {
        for len in 0..40usize {
            let items: Vec<usize> = (0..len).collect();
            for page_size in 1..15 {
                for requested in 0..6 {
                    let window = paginate(&items, page_size, requested);
                    assert!(window.items.len() <= page_size);
                    assert_eq!(window.items.is_empty(), items.is_empty());
                }
            }
        }
    }

    #[test]
    fn test_page_strip() {
        let items: Vec<usize> = (0..100).collect();
        let window = paginate(&items, 12, 1);
        assert_eq!(window.total_pages, 9);
        assert_eq!(window.page_numbers(PAGE_STRIP_LEN), 1..=5);

        let few: Vec<usize> = (0..20).collect();
        assert_eq!(paginate(&few, 12, 1).page_numbers(PAGE_STRIP_LEN), 1..=2);
    }
}
