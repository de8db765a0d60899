//! Search service: cache, validate, compile, execute, aggregate

use crate::error::Result;
use crate::metrics::{PREDICATES_PER_PLAN, QUERIES_TOTAL, QUERY_DURATION_SECONDS};
use crate::models::Issue;
use crate::search::aggregate::{count_by_status, StatusCounts};
use crate::search::cache::ParseCache;
use crate::search::compiler::{compile, CompileOptions, QueryPlan};
use crate::search::config::SearchConfig;
use crate::search::filter::{FilterDefaults, IssueFilters};
use crate::search::serialize::serialize;
use crate::search::sort::SortKey;
use crate::state::{IssueCorpus, Page};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// One search call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Raw query text
    pub query: String,

    /// Authenticated actor `@me` resolves to
    pub actor: Option<String>,

    /// Zero-based page
    #[serde(default)]
    pub page: u32,

    /// Requested page size, clamped to the configured maximum
    pub per_page: Option<u32>,

    /// Leave status unfiltered when the query has no `is:`
    #[serde(default)]
    pub any_state: bool,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn with_page(mut self, page: u32, per_page: u32) -> Self {
        self.page = page;
        self.per_page = Some(per_page);
        self
    }

    pub fn with_any_state(mut self) -> Self {
        self.any_state = true;
        self
    }
}

/// One page of results plus status-tab counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Issues on the requested page, in sort order
    pub issues: Vec<Issue>,

    /// Matches across all pages (status filter applied)
    pub total_count: u64,

    /// Per-status counts with the status filter removed
    pub counts: StatusCounts,

    /// The query rendered back in canonical form
    pub canonical_query: String,

    pub sort: SortKey,
    pub page: u32,
    pub per_page: u32,
}

/// Result of parsing without executing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedQuery {
    pub filters: IssueFilters,
    pub canonical_query: String,
}

/// Main search service
pub struct SearchService {
    corpus: Arc<dyn IssueCorpus>,
    cache: ParseCache,
    config: SearchConfig,
    defaults: FilterDefaults,
}

impl SearchService {
    /// Create a search service over `corpus`
    pub fn new(corpus: Arc<dyn IssueCorpus>, config: SearchConfig) -> Result<Self> {
        config.validate()?;

        let cache = ParseCache::new(config.parse_cache_capacity, config.parse_cache_ttl());
        let defaults = config.filter_defaults();

        Ok(Self {
            corpus,
            cache,
            config,
            defaults,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn corpus(&self) -> &Arc<dyn IssueCorpus> {
        &self.corpus
    }

    fn filters(&self, query: &str, any_state: bool) -> Arc<IssueFilters> {
        let defaults = if any_state {
            FilterDefaults::any_state()
        } else {
            self.defaults
        };
        self.cache.get_or_parse(query, &defaults)
    }

    fn plan(&self, filters: &IssueFilters, actor: Option<&str>) -> QueryPlan {
        let plan = compile(filters, actor, CompileOptions::default());
        PREDICATES_PER_PLAN.observe(plan.len() as f64);
        plan
    }

    /// Parse a raw query into its filter model and canonical text
    pub fn parse(&self, query: &str) -> ParsedQuery {
        QUERIES_TOTAL.with_label_values(&["parse"]).inc();

        let filters = self.filters(query, false);
        let canonical_query = serialize(&filters);

        ParsedQuery {
            filters: filters.as_ref().clone(),
            canonical_query,
        }
    }

    /// Run a search: one page of sorted results plus status counts
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        QUERIES_TOTAL.with_label_values(&["search"]).inc();
        let timer = QUERY_DURATION_SECONDS.with_label_values(&["search"]).start_timer();

        let actor = request.actor.as_deref();
        let filters = self.filters(&request.query, request.any_state);
        let plan = self.plan(&filters, actor);
        let page = Page::new(request.page, self.config.per_page(request.per_page));

        let (issues, total_count, counts) = tokio::try_join!(
            self.corpus.search(&plan, page),
            self.corpus.count(&plan),
            count_by_status(self.corpus.as_ref(), &filters, actor),
        )?;

        timer.observe_duration();

        tracing::debug!(
            query = %request.query,
            predicates = plan.len(),
            sort = %plan.sort,
            total = total_count,
            returned = issues.len(),
            "search executed"
        );

        Ok(SearchResponse {
            issues,
            total_count,
            counts,
            canonical_query: serialize(&filters),
            sort: plan.sort,
            page: page.page,
            per_page: page.per_page,
        })
    }

    /// Status-tab counts only
    pub async fn counts(&self, query: &str, actor: Option<&str>) -> Result<StatusCounts> {
        QUERIES_TOTAL.with_label_values(&["counts"]).inc();
        let timer = QUERY_DURATION_SECONDS.with_label_values(&["counts"]).start_timer();

        let filters = self.filters(query, false);
        let counts = count_by_status(self.corpus.as_ref(), &filters, actor).await?;

        timer.observe_duration();
        Ok(counts)
    }
}
