use crate::metrics::PARSE_CACHE_LOOKUPS_TOTAL;
use crate::search::filter::{FilterDefaults, IssueFilters, IssueState};
use moka::sync::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Memoizes tokenize + validate per raw query string.
///
/// Parsing is pure, so entries never go stale; the TTL only bounds memory held
/// by one-off queries.
#[derive(Clone)]
pub struct ParseCache {
    cache: Cache<(String, Option<IssueState>), Arc<IssueFilters>>,
}

impl ParseCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        Self { cache }
    }

    /// Return the cached filter model for `query`, parsing it on a miss
    pub fn get_or_parse(&self, query: &str, defaults: &FilterDefaults) -> Arc<IssueFilters> {
        let key = (query.to_string(), defaults.state);

        if let Some(filters) = self.cache.get(&key) {
            PARSE_CACHE_LOOKUPS_TOTAL.with_label_values(&["hit"]).inc();
            tracing::debug!(cache_hit = true, query, "Parse cache lookup");
            return filters;
        }

        PARSE_CACHE_LOOKUPS_TOTAL.with_label_values(&["miss"]).inc();
        tracing::debug!(cache_hit = false, query, "Parse cache lookup");
        let filters = Arc::new(IssueFilters::parse_with(query, defaults));
        self.cache.insert(key, filters.clone());
        filters
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}
