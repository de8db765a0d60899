//! Typed filter model and the validator that builds it from raw tokens.
//!
//! Validation never fails: anything outside a field's vocabulary is replaced
//! with that field's default.

use crate::search::lexer::{tokenize, FilterKey, RawFilters};
use crate::search::sort::SortKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Placeholder resolved to the authenticated actor at compile time
pub const CURRENT_ACTOR: &str = "@me";

/// Values accepted by `is:`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, EnumString, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum IssueState {
    Open,
    Closed,
}

/// Values accepted by `reason:`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, EnumString, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CloseReason {
    Completed,
    NotPlanned,
}

/// Fields free text is matched against (`in:`)
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, EnumString, Display, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TextScope {
    Title,
    Body,
    Comments,
}

/// `no:` shortcuts. A set flag overrides the positive and negative lists of
/// its category.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NoFilter {
    pub label: bool,
    pub assignee: bool,
}

impl NoFilter {
    pub fn is_empty(&self) -> bool {
        !self.label && !self.assignee
    }
}

/// Caller-controlled defaults applied during validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterDefaults {
    /// Status used when `is:` is missing or invalid; `None` leaves status unfiltered
    pub state: Option<IssueState>,
}

impl Default for FilterDefaults {
    fn default() -> Self {
        Self {
            state: Some(IssueState::Open),
        }
    }
}

impl FilterDefaults {
    pub fn any_state() -> Self {
        Self { state: None }
    }
}

/// The validated, defaulted form of one search query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueFilters {
    pub query: String,
    #[serde(rename = "in")]
    pub scopes: BTreeSet<TextScope>,
    pub is: Option<IssueState>,
    pub reason: Option<CloseReason>,
    pub labels: Vec<String>,
    pub excluded_labels: Vec<String>,
    pub assignees: Vec<String>,
    pub excluded_assignees: Vec<String>,
    pub author: Option<String>,
    pub excluded_author: Option<String>,
    pub mentions: Option<String>,
    pub excluded_mentions: Option<String>,
    pub no: NoFilter,
    pub sort: SortKey,
}

impl Default for IssueFilters {
    fn default() -> Self {
        Self::with_defaults(&FilterDefaults::default())
    }
}

impl IssueFilters {
    /// An empty filter set carrying the given defaults
    pub fn with_defaults(defaults: &FilterDefaults) -> Self {
        Self {
            query: String::new(),
            scopes: all_scopes(),
            is: defaults.state,
            reason: None,
            labels: Vec::new(),
            excluded_labels: Vec::new(),
            assignees: Vec::new(),
            excluded_assignees: Vec::new(),
            author: None,
            excluded_author: None,
            mentions: None,
            excluded_mentions: None,
            no: NoFilter::default(),
            sort: SortKey::default(),
        }
    }

    /// Tokenize and validate in one step
    pub fn parse(input: &str) -> Self {
        Self::parse_with(input, &FilterDefaults::default())
    }

    pub fn parse_with(input: &str, defaults: &FilterDefaults) -> Self {
        validate(&tokenize(input), defaults)
    }

    /// Whether free text is searched in every scope
    pub fn searches_all_scopes(&self) -> bool {
        self.scopes.len() == TextScope::iter().count()
    }
}

/// Build a filter model from tokenizer output, coercing invalid values to defaults.
pub fn validate(raw: &RawFilters, defaults: &FilterDefaults) -> IssueFilters {
    let mut filters = IssueFilters::with_defaults(defaults);

    filters.query = raw.query.clone();

    let scopes: BTreeSet<TextScope> = raw
        .values(FilterKey::In)
        .iter()
        .filter_map(|v| v.parse().ok())
        .collect();
    if !scopes.is_empty() {
        filters.scopes = scopes;
    }

    if let Some(state) = raw.value(FilterKey::Is).and_then(|v| v.parse().ok()) {
        filters.is = Some(state);
    }
    filters.reason = raw.value(FilterKey::Reason).and_then(|v| v.parse().ok());

    filters.labels = raw.values(FilterKey::Label).to_vec();
    filters.excluded_labels = raw.values(FilterKey::NotLabel).to_vec();
    filters.assignees = raw.values(FilterKey::Assignee).to_vec();
    filters.excluded_assignees = raw.values(FilterKey::NotAssignee).to_vec();

    filters.author = raw.value(FilterKey::Author).map(str::to_string);
    filters.excluded_author = raw.value(FilterKey::NotAuthor).map(str::to_string);
    filters.mentions = raw.value(FilterKey::Mentions).map(str::to_string);
    filters.excluded_mentions = raw.value(FilterKey::NotMentions).map(str::to_string);

    for value in raw.values(FilterKey::No) {
        match value.as_str() {
            "label" => filters.no.label = true,
            "assignee" => filters.no.assignee = true,
            other => tracing::debug!(value = other, "ignoring unknown no: value"),
        }
    }

    if let Some(sort) = raw.value(FilterKey::Sort) {
        filters.sort = SortKey::parse_or_default(sort);
    }

    filters
}

fn all_scopes() -> BTreeSet<TextScope> {
    TextScope::iter().collect()
}
