use crate::domain::recommendation::{RecommendationRequest, SearchHistoryItem};
use crate::storage::{self, KeyValueStore, SEARCHES_KEY};
use std::sync::Arc;

/// Number of searches kept; older entries are evicted first.
pub const HISTORY_CAPACITY: usize = 5;

#[derive(Clone)]
pub struct SearchHistoryStore {
    store: Arc<dyn KeyValueStore>,
}

impl SearchHistoryStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Appends the request to the log. Storage failures are logged and
    /// dropped; callers cannot observe them.
    pub fn save_search(&self, request: &RecommendationRequest) {
        if let Err(err) = self.try_save(request) {
            tracing::warn!(error = %err, industry = %request.industry, "failed to save search");
        }
    }

    /// Oldest first. Absent or unreadable storage yields an empty log.
    pub fn get_search_history(&self) -> Vec<SearchHistoryItem> {
        match storage::read_json::<Vec<SearchHistoryItem>>(&*self.store, SEARCHES_KEY) {
            Ok(items) => items.unwrap_or_default(),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load search history");
                Vec::new()
            }
        }
    }

    // A read failure aborts the save so the stored log is left untouched;
    // only an unparseable log is replaced.
    fn try_save(&self, request: &RecommendationRequest) -> anyhow::Result<()> {
        let mut items = match self.store.get(SEARCHES_KEY)? {
            None => Vec::new(),
            Some(raw) => {
                serde_json::from_str::<Vec<SearchHistoryItem>>(&raw).unwrap_or_else(|err| {
                    tracing::warn!(error = %err, "stored search history is corrupt; starting a fresh log");
                    Vec::new()
                })
            }
        };
        items.push(SearchHistoryItem::new(request.clone()));

        let overflow = items.len().saturating_sub(HISTORY_CAPACITY);
        items.drain(..overflow);

        storage::write_json(&*self.store, SEARCHES_KEY, &items)
    }
}
