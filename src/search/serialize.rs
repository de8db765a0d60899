//! Renders a filter model back into canonical query text

use crate::search::filter::IssueFilters;
use crate::search::lexer::FilterKey;
use crate::search::sort::SortKey;
use std::fmt;

/// Canonical query text for a filter model.
///
/// Keys are emitted in a fixed order, set-valued fields are sorted, label
/// values are always quoted and free text comes last. Fields equal to their
/// default (`in` covering every scope, `sort:created-desc`, no `no:` flags)
/// are omitted.
pub fn serialize(filters: &IssueFilters) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(state) = filters.is {
        parts.push(pair(FilterKey::Is, &state.to_string()));
    }
    if let Some(reason) = filters.reason {
        parts.push(pair(FilterKey::Reason, &reason.to_string()));
    }
    if let Some(author) = &filters.author {
        parts.push(pair(FilterKey::Author, &quote_if_needed(author)));
    }
    if let Some(author) = &filters.excluded_author {
        parts.push(pair(FilterKey::NotAuthor, &quote_if_needed(author)));
    }
    push_list(&mut parts, FilterKey::Assignee, &filters.assignees, quote_if_needed);
    push_list(&mut parts, FilterKey::NotAssignee, &filters.excluded_assignees, quote_if_needed);
    push_list(&mut parts, FilterKey::Label, &filters.labels, quote);
    push_list(&mut parts, FilterKey::NotLabel, &filters.excluded_labels, quote);
    if let Some(user) = &filters.mentions {
        parts.push(pair(FilterKey::Mentions, &quote_if_needed(user)));
    }
    if let Some(user) = &filters.excluded_mentions {
        parts.push(pair(FilterKey::NotMentions, &quote_if_needed(user)));
    }

    let mut no = Vec::new();
    if filters.no.assignee {
        no.push("assignee");
    }
    if filters.no.label {
        no.push("label");
    }
    if !no.is_empty() {
        parts.push(pair(FilterKey::No, &no.join(",")));
    }

    if !filters.searches_all_scopes() && !filters.scopes.is_empty() {
        let scopes: Vec<String> = filters.scopes.iter().map(ToString::to_string).collect();
        parts.push(pair(FilterKey::In, &scopes.join(",")));
    }

    if filters.sort != SortKey::default() {
        parts.push(pair(FilterKey::Sort, &filters.sort.to_string()));
    }

    if !filters.query.is_empty() {
        parts.push(filters.query.clone());
    }

    parts.join(" ")
}

impl fmt::Display for IssueFilters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&serialize(self))
    }
}

fn pair(key: FilterKey, value: &str) -> String {
    format!("{}:{}", key, value)
}

fn push_list(parts: &mut Vec<String>, key: FilterKey, values: &[String], render: fn(&str) -> String) {
    if values.is_empty() {
        return;
    }
    let rendered: Vec<String> = values.iter().map(|v| render(v)).collect();
    parts.push(pair(key, &rendered.join(",")));
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value)
}

fn quote_if_needed(value: &str) -> String {
    if value.chars().any(|c| c.is_whitespace() || c == ',') {
        quote(value)
    } else {
        value.to_string()
    }
}
