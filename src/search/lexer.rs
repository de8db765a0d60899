//! Query tokenizer
//!
//! Splits raw query text into whitespace-delimited tokens with a two-state
//! lexer (double quotes suspend splitting), then classifies each token as a
//! recognized `key:value` filter or free text.

use std::collections::HashMap;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Every key the query language recognizes. Keys are case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumString, Display, EnumIter, IntoStaticStr)]
pub enum FilterKey {
    #[strum(serialize = "in")]
    In,
    #[strum(serialize = "no")]
    No,
    #[strum(serialize = "label")]
    Label,
    #[strum(serialize = "-label")]
    NotLabel,
    #[strum(serialize = "assignee")]
    Assignee,
    #[strum(serialize = "-assignee")]
    NotAssignee,
    #[strum(serialize = "is")]
    Is,
    #[strum(serialize = "reason")]
    Reason,
    #[strum(serialize = "author")]
    Author,
    #[strum(serialize = "-author")]
    NotAuthor,
    #[strum(serialize = "mentions")]
    Mentions,
    #[strum(serialize = "-mentions")]
    NotMentions,
    #[strum(serialize = "sort")]
    Sort,
}

impl FilterKey {
    /// Multi-valued keys split on commas and accumulate across repeats;
    /// the rest keep only their last occurrence.
    pub fn is_multi_valued(self) -> bool {
        matches!(
            self,
            FilterKey::In
                | FilterKey::No
                | FilterKey::Label
                | FilterKey::NotLabel
                | FilterKey::Assignee
                | FilterKey::NotAssignee
        )
    }
}

/// Intermediate result of tokenizing: recognized keys with their raw values
/// plus the free-text remainder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFilters {
    /// Free-text tokens, space-joined in input order
    pub query: String,
    values: HashMap<FilterKey, Vec<String>>,
}

impl RawFilters {
    /// All values collected for a multi-valued key, in first-seen order
    pub fn values(&self, key: FilterKey) -> &[String] {
        self.values.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The winning value for a single-valued key
    pub fn value(&self, key: FilterKey) -> Option<&str> {
        self.values.get(&key).and_then(|v| v.last()).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty() && self.values.is_empty()
    }

    fn push_text(&mut self, token: &str) {
        if !self.query.is_empty() {
            self.query.push(' ');
        }
        self.query.push_str(token);
    }

    fn insert(&mut self, key: FilterKey, values: Vec<String>) {
        let slot = self.values.entry(key).or_default();
        if key.is_multi_valued() {
            for value in values {
                if !slot.contains(&value) {
                    slot.push(value);
                }
            }
        } else {
            *slot = values;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Default,
    InQuotes,
}

/// Split on whitespace outside double-quoted spans. Quote characters are kept
/// in the emitted tokens; an unterminated quote runs to end of input.
pub fn lex(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut state = LexState::Default;

    for ch in input.chars() {
        match (state, ch) {
            (LexState::Default, '"') => {
                current.push(ch);
                state = LexState::InQuotes;
            }
            (LexState::Default, c) if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            (LexState::InQuotes, '"') => {
                current.push(ch);
                state = LexState::Default;
            }
            (_, c) => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Tokenize a raw query into recognized key/values and free text.
pub fn tokenize(input: &str) -> RawFilters {
    let mut raw = RawFilters::default();

    for token in lex(input) {
        match classify(&token) {
            Some((key, values)) => raw.insert(key, values),
            None => raw.push_text(&token),
        }
    }

    raw
}

/// Returns `None` when the token should be treated as free text.
fn classify(token: &str) -> Option<(FilterKey, Vec<String>)> {
    let (key, value) = token.split_once(':')?;
    let key: FilterKey = key.parse().ok()?;

    let values = if key.is_multi_valued() {
        split_list(value)
    } else {
        let value = strip_quotes(value);
        if value.is_empty() {
            Vec::new()
        } else {
            vec![value]
        }
    };

    if values.is_empty() {
        None
    } else {
        Some((key, values))
    }
}

/// Split a list value on commas that sit outside quotes.
fn split_list(value: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in value.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ',' if !in_quotes => parts.push(std::mem::take(&mut current)),
            c => current.push(c),
        }
    }
    parts.push(current);

    parts
        .iter()
        .map(|part| strip_quotes(part))
        .filter(|part| !part.is_empty())
        .collect()
}

/// Quotes only delimit values; none survive into the value itself, so every
/// value can be re-quoted when serialized.
fn strip_quotes(value: &str) -> String {
    value.chars().filter(|c| *c != '"').collect()
}
