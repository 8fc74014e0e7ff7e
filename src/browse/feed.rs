//! Incremental loading of a listing from a record source.
//!
//! A [`Feed`] owns the item cache for one view and grows it a backend
//! page at a time. It keeps at most one fetch in flight: `load_more`
//! checks and sets a loading flag before fetching and clears it when the
//! fetch settles, so rapid repeated clicks never issue duplicate page
//! requests. Results that arrive after the view was closed, or after a
//! reload started, are dropped.
//!
//! Fetch failures are logged and degrade to "no new records"; they are
//! never surfaced as errors to the view.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::cache::ItemCache;
use super::filter::Browsable;
use crate::adapters::{PageQuery, RecordSource};

/// What happened to a load request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Page applied to the cache
    Loaded { fetched: usize, added: usize },

    /// Another load was already in flight
    Busy,

    /// The view is closed; nothing was fetched
    Closed,

    /// The fetch failed; cache left unchanged
    Failed,

    /// The result arrived after the view closed or reloaded
    Discarded,
}

struct FeedState<T> {
    cache: ItemCache<T>,
    loading: bool,
    closed: bool,
    /// Bumped on every reload so stale in-flight results can be spotted
    generation: u64,
}

/// Paged loader for one listing view
pub struct Feed<T> {
    source: Arc<dyn RecordSource>,
    /// Query template; the offset is filled in per page
    query: PageQuery,
    state: Arc<Mutex<FeedState<T>>>,
}

impl<T> Clone for Feed<T> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            query: self.query.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Feed<T>
where
    T: Browsable + DeserializeOwned + Send,
{
    /// Create a feed; `query.limit` is the backend page size (at least 1)
    pub fn new(source: Arc<dyn RecordSource>, mut query: PageQuery) -> Self {
        query.limit = query.limit.max(1);
        Self {
            source,
            query,
            state: Arc::new(Mutex::new(FeedState {
                cache: ItemCache::new(),
                loading: false,
                closed: false,
                generation: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FeedState<T>> {
        // State stays consistent across a panic in a reader closure
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Backend page size
    pub fn page_size(&self) -> usize {
        self.query.limit
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn has_more(&self) -> bool {
        self.lock().cache.has_more()
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Read the cache without cloning it
    pub fn with_cache<R>(&self, f: impl FnOnce(&ItemCache<T>) -> R) -> R {
        f(&self.lock().cache)
    }

    /// Clear the cache and fetch the first page (fresh mount)
    pub async fn reload(&self) -> LoadOutcome {
        {
            let mut state = self.lock();
            if state.closed {
                return LoadOutcome::Closed;
            }
            state.cache.reset();
            state.generation += 1;
            // A reload supersedes whatever was in flight
            state.loading = false;
        }
        self.fetch_next(true).await
    }

    /// Fetch the next backend page and append it
    pub async fn load_more(&self) -> LoadOutcome {
        self.fetch_next(false).await
    }

    /// Keep loading until the backend runs dry or `max_pages` is reached
    pub async fn load_all(&self, max_pages: usize) -> LoadOutcome {
        let mut last = self.reload().await;
        for _ in 1..max_pages {
            if !matches!(last, LoadOutcome::Loaded { .. }) || !self.has_more() {
                break;
            }
            last = self.load_more().await;
        }
        last
    }

    /// Tear down: later results are discarded and no new loads start
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.loading = false;
    }

    async fn fetch_next(&self, replace: bool) -> LoadOutcome {
        let (query, generation) = {
            let mut state = self.lock();
            if state.closed {
                return LoadOutcome::Closed;
            }
            if state.loading {
                tracing::debug!(table = %self.query.table, "Load already in flight, skipping");
                return LoadOutcome::Busy;
            }
            state.loading = true;

            let offset = state.cache.pages_loaded() * self.query.limit;
            (self.query.clone().at_offset(offset), state.generation)
        };

        let result = self.source.fetch_page(&query).await;

        let mut state = self.lock();
        if state.closed || state.generation != generation {
            tracing::debug!(table = %query.table, "Dropping result for a closed or reloaded view");
            return LoadOutcome::Discarded;
        }
        state.loading = false;

        match result {
            Ok(rows) => {
                let fetched = rows.len();
                let records = decode_rows::<T>(rows, &query);
                let added = if replace {
                    state.cache.replace_page(records, fetched, query.limit)
                } else {
                    state.cache.append_fetched(records, fetched, query.limit)
                };
                tracing::info!(
                    table = %query.table,
                    offset = query.offset,
                    fetched,
                    added,
                    has_more = state.cache.has_more(),
                    "Page loaded"
                );
                LoadOutcome::Loaded { fetched, added }
            }
            Err(e) => {
                tracing::warn!(table = %query.table, offset = query.offset, "Failed to load page: {}", e);
                LoadOutcome::Failed
            }
        }
    }
}

/// Decode raw rows, skipping any that do not fit the record type
fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>, query: &PageQuery) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value::<T>(row) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(table = %query.table, "Skipping undecodable record: {}", e);
                None
            }
        })
        .collect()
}
