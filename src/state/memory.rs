use crate::error::{AppError, Result};
use crate::models::{Issue, IssueStatus};
use crate::search::{Association, Predicate, QueryPlan, TextScope};
use crate::state::index::{normalize_username, InvertedIndex, KeyNormalization};
use crate::state::{IssueCorpus, Page};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// In-memory issue corpus with inverted indexes for labels, assignees and
/// mentions
#[derive(Clone)]
pub struct InMemoryCorpus {
    issues: Arc<DashMap<Uuid, Issue>>,
    labels: Arc<InvertedIndex>,
    assignees: Arc<InvertedIndex>,
    mentions: Arc<InvertedIndex>,
}

impl InMemoryCorpus {
    pub fn new() -> Self {
        Self {
            issues: Arc::new(DashMap::new()),
            labels: Arc::new(InvertedIndex::new(KeyNormalization::Exact)),
            assignees: Arc::new(InvertedIndex::new(KeyNormalization::Username)),
            mentions: Arc::new(InvertedIndex::new(KeyNormalization::Username)),
        }
    }

    /// Build a corpus from a batch of issues
    pub async fn with_issues(issues: impl IntoIterator<Item = Issue>) -> Result<Self> {
        let corpus = Self::new();
        for issue in issues {
            corpus.save_issue(&issue).await?;
        }
        Ok(corpus)
    }

    /// Ids of issues mentioning `username` in the body or a comment
    pub fn mentioning(&self, username: &str) -> std::collections::HashSet<Uuid> {
        self.mentions.ids(username)
    }

    fn index(&self, association: Association) -> &InvertedIndex {
        match association {
            Association::Label => &self.labels,
            Association::Assignee => &self.assignees,
        }
    }

    fn index_issue(&self, issue: &Issue) {
        self.labels.insert(issue.id, &issue.labels);
        self.assignees.insert(issue.id, &issue.assignees);
        self.mentions.insert(issue.id, &issue.mentioned_users());
    }

    fn unindex_issue(&self, issue: &Issue) {
        self.labels.remove(&issue.id, &issue.labels);
        self.assignees.remove(&issue.id, &issue.assignees);
        self.mentions.remove(&issue.id, &issue.mentioned_users());
    }

    fn matches(&self, issue: &Issue, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::Contains { scope, needle } => match scope {
                TextScope::Title => contains_ignore_case(&issue.title, needle),
                TextScope::Body => contains_ignore_case(&issue.body, needle),
                TextScope::Comments => issue
                    .comments
                    .iter()
                    .any(|c| contains_ignore_case(&c.body, needle)),
            },
            Predicate::AuthorIs(user) => normalize_username(&issue.author) == *user,
            Predicate::HasAll { association, names } => self.index(*association).has_all(&issue.id, names),
            Predicate::HasNone(Association::Label) => issue.labels.is_empty(),
            Predicate::HasNone(Association::Assignee) => issue.assignees.is_empty(),
            Predicate::Mentions(user) => self.mentions.contains(&issue.id, user),
            Predicate::Status(status) => issue.status == *status,
            Predicate::Any(group) => group.iter().any(|p| self.matches(issue, p)),
            Predicate::Not(inner) => !self.matches(issue, inner),
        }
    }

    fn matches_plan(&self, issue: &Issue, plan: &QueryPlan) -> bool {
        plan.predicates.iter().all(|p| self.matches(issue, p))
    }

    fn filtered(&self, plan: &QueryPlan) -> Vec<Issue> {
        self.issues
            .iter()
            .filter(|entry| self.matches_plan(entry.value(), plan))
            .map(|entry| entry.value().clone())
            .collect()
    }
}

impl Default for InMemoryCorpus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IssueCorpus for InMemoryCorpus {
    async fn save_issue(&self, issue: &Issue) -> Result<()> {
        issue.validate()?;

        if let Some(previous) = self.issues.insert(issue.id, issue.clone()) {
            self.unindex_issue(&previous);
        }
        self.index_issue(issue);

        tracing::debug!(issue_id = %issue.id, number = issue.number, "Issue saved");
        Ok(())
    }

    async fn get_issue(&self, id: &Uuid) -> Result<Option<Issue>> {
        Ok(self.issues.get(id).map(|entry| entry.clone()))
    }

    async fn delete_issue(&self, id: &Uuid) -> Result<()> {
        if let Some((_, issue)) = self.issues.remove(id) {
            self.unindex_issue(&issue);
            tracing::debug!(issue_id = %id, "Issue deleted");
            Ok(())
        } else {
            Err(AppError::NotFound(format!("Issue {} not found", id)))
        }
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.issues.len())
    }

    async fn search(&self, plan: &QueryPlan, page: Page) -> Result<Vec<Issue>> {
        let mut issues = self.filtered(plan);
        issues.sort_by(|a, b| plan.sort.compare(a, b));

        Ok(issues
            .into_iter()
            .skip(page.offset())
            .take(page.per_page as usize)
            .collect())
    }

    async fn count(&self, plan: &QueryPlan) -> Result<u64> {
        let count = self
            .issues
            .iter()
            .filter(|entry| self.matches_plan(entry.value(), plan))
            .count();

        Ok(count as u64)
    }

    async fn group_by_status(&self, plan: &QueryPlan) -> Result<HashMap<IssueStatus, u64>> {
        let mut groups = HashMap::new();
        for entry in self.issues.iter() {
            let issue = entry.value();
            if self.matches_plan(issue, plan) {
                *groups.entry(issue.status).or_insert(0) += 1;
            }
        }
        Ok(groups)
    }
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}
