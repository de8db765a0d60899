//! Compiles a filter model into a predicate plan.
//!
//! The plan is an ordered list of independent predicates, all of which must
//! hold, plus the sort directive. Compilation is pure: no I/O, no failure.
//! Unresolvable `@me` references drop their clause instead of matching nothing.

use crate::models::IssueStatus;
use crate::search::filter::{CloseReason, IssueFilters, IssueState, TextScope, CURRENT_ACTOR};
use crate::search::sort::SortKey;
use crate::state::index::normalize_username;
use serde::Serialize;
use std::collections::BTreeSet;

/// Set-valued issue associations
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Association {
    Label,
    Assignee,
}

/// One boolean condition over an issue
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Predicate {
    /// Case-insensitive substring match; `needle` is already lowercased
    Contains { scope: TextScope, needle: String },
    /// Author equals the (normalized) username
    AuthorIs(String),
    /// Issue carries every name in the set (extra names permitted)
    HasAll {
        association: Association,
        names: BTreeSet<String>,
    },
    /// Issue has no values at all for the association
    HasNone(Association),
    /// Username is mentioned in the body or any comment
    Mentions(String),
    Status(IssueStatus),
    Any(Vec<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    pub fn not(self) -> Self {
        Predicate::Not(Box::new(self))
    }

    pub fn is_status(&self) -> bool {
        match self {
            Predicate::Status(_) => true,
            Predicate::Not(inner) => inner.is_status(),
            _ => false,
        }
    }
}

/// Compiled form of a filter model
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct QueryPlan {
    pub predicates: Vec<Predicate>,
    pub sort: SortKey,
}

impl QueryPlan {
    /// A plan with no predicates matches every issue
    pub fn matches_everything(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn has_status_filter(&self) -> bool {
        self.predicates.iter().any(Predicate::is_status)
    }
}

/// Compilation switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Emit the status predicate. The aggregator turns this off.
    pub include_status_filter: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            include_status_filter: true,
        }
    }
}

impl CompileOptions {
    pub fn without_status() -> Self {
        Self {
            include_status_filter: false,
        }
    }
}

/// Compile `filters` for the given authenticated actor (if any).
pub fn compile(filters: &IssueFilters, actor: Option<&str>, options: CompileOptions) -> QueryPlan {
    let mut predicates = Vec::new();

    if let Some(text) = text_predicate(filters) {
        predicates.push(text);
    }

    let excluded_author = filters
        .excluded_author
        .as_deref()
        .and_then(|v| resolve_user(v, actor));
    let author = filters.author.as_deref().and_then(|v| resolve_user(v, actor));
    match (excluded_author, author) {
        (Some(user), _) => predicates.push(Predicate::AuthorIs(user).not()),
        (None, Some(user)) => predicates.push(Predicate::AuthorIs(user)),
        (None, None) => {}
    }

    let labels = |values: &[String]| values.iter().cloned().collect::<BTreeSet<_>>();
    predicates.extend(membership_predicates(
        Association::Label,
        filters.no.label,
        labels(&filters.labels),
        labels(&filters.excluded_labels),
    ));

    let users = |values: &[String]| {
        values
            .iter()
            .filter_map(|v| resolve_user(v, actor))
            .collect::<BTreeSet<_>>()
    };
    predicates.extend(membership_predicates(
        Association::Assignee,
        filters.no.assignee,
        users(&filters.assignees),
        users(&filters.excluded_assignees),
    ));

    if let Some(user) = filters.mentions.as_deref().and_then(|v| resolve_user(v, actor)) {
        predicates.push(Predicate::Mentions(user));
    }
    if let Some(user) = filters
        .excluded_mentions
        .as_deref()
        .and_then(|v| resolve_user(v, actor))
    {
        predicates.push(Predicate::Mentions(user).not());
    }

    if options.include_status_filter {
        if let Some(status) = status_predicate(filters.is, filters.reason) {
            predicates.push(status);
        }
    }

    let plan = QueryPlan {
        predicates,
        sort: filters.sort,
    };

    tracing::debug!(
        predicates = plan.len(),
        sort = %plan.sort,
        include_status = options.include_status_filter,
        "compiled issue query"
    );

    plan
}

fn text_predicate(filters: &IssueFilters) -> Option<Predicate> {
    let needle = filters.query.trim().to_lowercase();
    if needle.is_empty() || filters.scopes.is_empty() {
        return None;
    }

    let mut group: Vec<Predicate> = filters
        .scopes
        .iter()
        .map(|scope| Predicate::Contains {
            scope: *scope,
            needle: needle.clone(),
        })
        .collect();

    if group.len() == 1 {
        group.pop()
    } else {
        Some(Predicate::Any(group))
    }
}

/// `no:` short-circuits both lists. The negative list excludes only issues
/// carrying every one of its names.
fn membership_predicates(
    association: Association,
    has_none: bool,
    included: BTreeSet<String>,
    excluded: BTreeSet<String>,
) -> Vec<Predicate> {
    if has_none {
        return vec![Predicate::HasNone(association)];
    }

    let mut predicates = Vec::new();
    if !included.is_empty() {
        predicates.push(Predicate::HasAll {
            association,
            names: included,
        });
    }
    if !excluded.is_empty() {
        predicates.push(
            Predicate::HasAll {
                association,
                names: excluded,
            }
            .not(),
        );
    }
    predicates
}

fn status_predicate(state: Option<IssueState>, reason: Option<CloseReason>) -> Option<Predicate> {
    match (state, reason) {
        (Some(IssueState::Open), _) => Some(Predicate::Status(IssueStatus::Open)),
        (_, Some(CloseReason::Completed)) => Some(Predicate::Status(IssueStatus::Closed)),
        (_, Some(CloseReason::NotPlanned)) => Some(Predicate::Status(IssueStatus::NotPlanned)),
        (Some(IssueState::Closed), None) => Some(Predicate::Status(IssueStatus::Open).not()),
        (None, None) => None,
    }
}

/// Resolve `@me` and normalize a username; `None` drops the clause.
fn resolve_user(value: &str, actor: Option<&str>) -> Option<String> {
    let user = if value == CURRENT_ACTOR {
        normalize_username(actor?)
    } else {
        normalize_username(value)
    };

    if user.is_empty() {
        None
    } else {
        Some(user)
    }
}
