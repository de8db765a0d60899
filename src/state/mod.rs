pub mod factory;
pub mod index;
pub mod memory;

pub use factory::{create_corpus, load_issues};
pub use index::{InvertedIndex, KeyNormalization};
pub use memory::InMemoryCorpus;

use crate::error::Result;
use crate::models::{Issue, IssueStatus};
use crate::search::QueryPlan;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// The store a compiled [`QueryPlan`] is executed against.
///
/// Implementations own evaluation, ordering and pagination. Failures here
/// (storage unavailable and the like) are the only hard errors a search can
/// surface.
#[async_trait]
pub trait IssueCorpus: Send + Sync {
    /// Insert or replace an issue
    async fn save_issue(&self, issue: &Issue) -> Result<()>;

    /// Get an issue by ID
    async fn get_issue(&self, id: &Uuid) -> Result<Option<Issue>>;

    /// Delete an issue
    async fn delete_issue(&self, id: &Uuid) -> Result<()>;

    /// Number of stored issues
    async fn len(&self) -> Result<usize>;

    /// Issues matching every predicate, ordered by the plan's sort key
    async fn search(&self, plan: &QueryPlan, page: Page) -> Result<Vec<Issue>>;

    /// Count of issues matching every predicate
    async fn count(&self, plan: &QueryPlan) -> Result<u64>;

    /// Matching issues grouped by stored status
    async fn group_by_status(&self, plan: &QueryPlan) -> Result<HashMap<IssueStatus, u64>>;
}

/// Zero-based page window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub page: u32,
    pub per_page: u32,
}

impl Page {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    pub fn offset(&self) -> usize {
        self.page as usize * self.per_page as usize
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { page: 0, per_page: 25 }
    }
}
