//! Status-tab counts for a filter set.
//!
//! Counts are computed from the plan compiled without its status predicate, so
//! they describe what each status tab would show with every other filter held
//! fixed. Pagination and sort do not affect them.

use crate::error::Result;
use crate::models::IssueStatus;
use crate::search::compiler::{compile, CompileOptions};
use crate::search::filter::IssueFilters;
use crate::state::IssueCorpus;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub total_count: u64,
    pub open_count: u64,
    pub completed_count: u64,
    pub not_planned_count: u64,
}

impl StatusCounts {
    /// Fold per-status group sizes into tab counts
    pub fn from_groups(groups: &HashMap<IssueStatus, u64>) -> Self {
        let get = |status| groups.get(&status).copied().unwrap_or(0);

        let open_count = get(IssueStatus::Open);
        let completed_count = get(IssueStatus::Closed);
        let not_planned_count = get(IssueStatus::NotPlanned);

        Self {
            total_count: open_count + completed_count + not_planned_count,
            open_count,
            completed_count,
            not_planned_count,
        }
    }

    /// Closed issues of either terminal reason
    pub fn closed_count(&self) -> u64 {
        self.completed_count + self.not_planned_count
    }
}

/// Count matching issues per status, ignoring the filter's `is` and `reason`
pub async fn count_by_status(
    corpus: &dyn IssueCorpus,
    filters: &IssueFilters,
    actor: Option<&str>,
) -> Result<StatusCounts> {
    let plan = compile(filters, actor, CompileOptions::without_status());
    let groups = corpus.group_by_status(&plan).await?;
    let counts = StatusCounts::from_groups(&groups);

    tracing::debug!(
        predicates = plan.len(),
        total = counts.total_count,
        open = counts.open_count,
        "aggregated status counts"
    );

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Issue;
    use crate::state::InMemoryCorpus;

    async fn corpus() -> InMemoryCorpus {
        InMemoryCorpus::with_issues(vec![
            Issue::new(1, "alice", "Crash on start", "").with_labels(["bug"]),
            Issue::new(2, "bob", "Crash on exit", "")
                .with_labels(["bug"])
                .with_status(IssueStatus::Closed),
            Issue::new(3, "carol", "Crash in docs", "")
                .with_labels(["bug"])
                .with_status(IssueStatus::NotPlanned),
            Issue::new(4, "dave", "Add dark mode", "").with_labels(["feature"]),
        ])
        .await
        .unwrap()
    }

    #[test]
    fn test_from_groups_sums_missing_as_zero() {
        let groups = HashMap::from([(IssueStatus::Open, 3), (IssueStatus::NotPlanned, 1)]);
        let counts = StatusCounts::from_groups(&groups);
        assert_eq!(counts.total_count, 4);
        assert_eq!(counts.completed_count, 0);
        assert_eq!(counts.closed_count(), 1);
    }

    #[tokio::test]
    async fn test_counts_ignore_status_filter() {
        let corpus = corpus().await;

        for query in ["label:bug", "is:open label:bug", "is:closed label:bug", "is:closed reason:completed label:bug"] {
            let counts = count_by_status(&corpus, &IssueFilters::parse(query), None).await.unwrap();
            assert_eq!(
                counts,
                StatusCounts {
                    total_count: 3,
                    open_count: 1,
                    completed_count: 1,
                    not_planned_count: 1,
                },
                "query {query}"
            );
        }
    }

    #[tokio::test]
    async fn test_counts_respect_other_filters() {
        let corpus = corpus().await;
        let counts = count_by_status(&corpus, &IssueFilters::parse("crash in:title -author:bob"), None)
            .await
            .unwrap();
        assert_eq!(counts.total_count, 2);
        assert_eq!(counts.completed_count, 0);
    }
}
