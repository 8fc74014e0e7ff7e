//! Append-only cache of fetched records.

use std::collections::HashSet;

use super::filter::Browsable;
use crate::domain::ItemId;

/// Records fetched so far for one listing, in fetch order
#[derive(Debug, Clone)]
pub struct ItemCache<T> {
    items: Vec<T>,
    seen: HashSet<ItemId>,
    has_more: bool,
    pages_loaded: usize,
}

impl<T> Default for ItemCache<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
            has_more: false,
            pages_loaded: 0,
        }
    }
}

impl<T: Browsable> ItemCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fetched page.
    ///
    /// A short page (fewer records than requested) marks the end of data.
    pub fn append_page(&mut self, records: Vec<T>, page_size: usize) -> usize {
        let fetched = records.len();
        self.append_fetched(records, fetched, page_size)
    }

    /// Append decoded records from a page the backend returned `fetched`
    /// records for. Returns the number of records actually added.
    ///
    /// `fetched` can exceed `records.len()` when some rows failed to
    /// decode; end-of-data is judged on what the backend sent.
    pub fn append_fetched(&mut self, records: Vec<T>, fetched: usize, page_size: usize) -> usize {
        let before = self.items.len();
        for record in records {
            if self.seen.insert(record.id().clone()) {
                self.items.push(record);
            }
        }

        self.has_more = page_size > 0 && fetched == page_size;
        self.pages_loaded += 1;
        self.items.len() - before
    }

    /// Replace the contents with a first page
    pub fn replace_page(&mut self, records: Vec<T>, fetched: usize, page_size: usize) -> usize {
        self.reset();
        self.append_fetched(records, fetched, page_size)
    }

    /// Forget everything (fresh mount)
    pub fn reset(&mut self) {
        self.items.clear();
        self.seen.clear();
        self.has_more = false;
        self.pages_loaded = 0;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Whether the backend may hold more records
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Number of backend pages applied since the last reset
    pub fn pages_loaded(&self) -> usize {
        self.pages_loaded
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LibraryItem, MediaType};

    fn batch(start: usize, len: usize) -> Vec<LibraryItem> {
        (start..start + len)
            .map(|i| LibraryItem::new(i.to_string(), MediaType::Article, format!("Item {}", i)))
            .collect()
    }

    #[test]
    fn test_full_then_short_page() {
        let mut cache = ItemCache::new();

        cache.append_page(batch(0, 12), 12);
        assert!(cache.has_more());

        cache.append_page(batch(12, 5), 12);
        assert!(!cache.has_more());
        assert_eq!(cache.len(), 17);
        assert_eq!(cache.pages_loaded(), 2);
    }

    #[test]
    fn test_appends_preserve_call_order() {
        let mut cache = ItemCache::new();
        let batches = [batch(0, 3), batch(3, 3), batch(6, 2)];

        for b in &batches {
            cache.append_page(b.clone(), 3);
        }

        let expected: Vec<LibraryItem> = batches.concat();
        assert_eq!(cache.items(), expected.as_slice());
    }

    #[test]
    fn test_empty_page_ends_data() {
        let mut cache: ItemCache<LibraryItem> = ItemCache::new();
        assert_eq!(cache.append_page(Vec::new(), 12), 0);
        assert!(!cache.has_more());
    }

    #[test]
    fn test_zero_page_size_never_reports_more() {
        let mut cache: ItemCache<LibraryItem> = ItemCache::new();
        cache.append_page(Vec::new(), 0);
        assert!(!cache.has_more());
    }

    #[test]
    fn test_duplicates_are_skipped() {
        let mut cache = ItemCache::new();
        cache.append_page(batch(0, 4), 4);

        // Overlapping page (e.g. a record was inserted upstream between fetches)
        let added = cache.append_page(batch(2, 4), 4);
        assert_eq!(added, 2);
        assert_eq!(cache.len(), 6);
        assert!(cache.has_more());
    }

    #[test]
    fn test_has_more_uses_fetched_count() {
        let mut cache = ItemCache::new();
        // 12 rows came back but one failed to decode
        cache.append_fetched(batch(0, 11), 12, 12);
        assert!(cache.has_more());
        assert_eq!(cache.len(), 11);
    }

    #[test]
    fn test_replace_and_reset() {
        let mut cache = ItemCache::new();
        cache.append_page(batch(0, 12), 12);

        cache.replace_page(batch(100, 2), 2, 12);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.pages_loaded(), 1);
        assert!(!cache.has_more());

        cache.reset();
        assert!(cache.is_empty());
        assert_eq!(cache.pages_loaded(), 0);
    }
}
