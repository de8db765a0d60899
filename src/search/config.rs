//! Search configuration

use crate::search::filter::{FilterDefaults, IssueState};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::{Validate, ValidationError};

/// Query engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_page_sizes"))]
pub struct SearchConfig {
    /// Status applied when a query has no usable `is:` ("open", "closed" or "any")
    #[serde(default = "default_state")]
    pub default_state: Option<String>,

    /// Maximum number of parsed queries kept in the parse cache
    #[validate(range(min = 1))]
    pub parse_cache_capacity: u64,

    /// Time-to-live of a parse cache entry
    #[validate(range(min = 1))]
    pub parse_cache_ttl_secs: u64,

    /// Page size when the caller does not ask for one
    #[validate(range(min = 1, max = 1000))]
    pub default_per_page: u32,

    /// Upper bound for caller-requested page sizes
    #[validate(range(min = 1, max = 1000))]
    pub max_per_page: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_state: default_state(),
            parse_cache_capacity: 1024,
            parse_cache_ttl_secs: 300,
            default_per_page: 25,
            max_per_page: 100,
        }
    }
}

impl SearchConfig {
    /// Validator defaults derived from `default_state`
    pub fn filter_defaults(&self) -> FilterDefaults {
        match self.default_state.as_deref() {
            None | Some("any") => FilterDefaults::any_state(),
            Some(raw) => match raw.parse::<IssueState>() {
                Ok(state) => FilterDefaults { state: Some(state) },
                Err(_) => {
                    tracing::warn!(default_state = raw, "unknown default_state, using open");
                    FilterDefaults::default()
                }
            },
        }
    }

    pub fn parse_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.parse_cache_ttl_secs)
    }

    /// Clamp a requested page size into `1..=max_per_page`
    pub fn per_page(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_per_page)
            .clamp(1, self.max_per_page)
    }
}

fn default_state() -> Option<String> {
    Some("open".to_string())
}

fn validate_page_sizes(config: &SearchConfig) -> Result<(), ValidationError> {
    if config.default_per_page > config.max_per_page {
        return Err(ValidationError::new("default_per_page_exceeds_max"));
    }
    Ok(())
}

/// Builder for SearchConfig
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
        }
    }

    pub fn default_state(mut self, state: Option<&str>) -> Self {
        self.config.default_state = state.map(str::to_string);
        self
    }

    pub fn parse_cache_capacity(mut self, capacity: u64) -> Self {
        self.config.parse_cache_capacity = capacity;
        self
    }

    pub fn parse_cache_ttl_secs(mut self, secs: u64) -> Self {
        self.config.parse_cache_ttl_secs = secs;
        self
    }

    pub fn default_per_page(mut self, per_page: u32) -> Self {
        self.config.default_per_page = per_page;
        self
    }

    pub fn max_per_page(mut self, max: u32) -> Self {
        self.config.max_per_page = max;
        self
    }

    pub fn build(self) -> SearchConfig {
        self.config
    }
}

impl Default for SearchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
