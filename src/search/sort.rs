//! Sort key vocabulary and its resolution to a concrete ordering

use crate::models::{Issue, ReactionKind};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Sort direction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Field an ordering is computed from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    UpdatedAt,
    Comments,
    Reactions(ReactionKind),
}

/// The fourteen recognized `sort:` values.
///
/// `relevance-desc` is accepted but ranks like `created-desc`.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, EnumString, Display, EnumIter, IntoStaticStr,
)]
pub enum SortKey {
    #[strum(serialize = "created-asc")]
    #[serde(rename = "created-asc")]
    CreatedAsc,
    #[default]
    #[strum(serialize = "created-desc")]
    #[serde(rename = "created-desc")]
    CreatedDesc,
    #[strum(serialize = "updated-asc")]
    #[serde(rename = "updated-asc")]
    UpdatedAsc,
    #[strum(serialize = "updated-desc")]
    #[serde(rename = "updated-desc")]
    UpdatedDesc,
    #[strum(serialize = "comments-asc")]
    #[serde(rename = "comments-asc")]
    CommentsAsc,
    #[strum(serialize = "comments-desc")]
    #[serde(rename = "comments-desc")]
    CommentsDesc,
    #[strum(serialize = "relevance-desc")]
    #[serde(rename = "relevance-desc")]
    RelevanceDesc,
    #[strum(serialize = "reactions-+1-desc")]
    #[serde(rename = "reactions-+1-desc")]
    ReactionsThumbsUpDesc,
    #[strum(serialize = "reactions--1-desc")]
    #[serde(rename = "reactions--1-desc")]
    ReactionsThumbsDownDesc,
    #[strum(serialize = "reactions-laugh-desc")]
    #[serde(rename = "reactions-laugh-desc")]
    ReactionsLaughDesc,
    #[strum(serialize = "reactions-confused-desc")]
    #[serde(rename = "reactions-confused-desc")]
    ReactionsConfusedDesc,
    #[strum(serialize = "reactions-heart-desc")]
    #[serde(rename = "reactions-heart-desc")]
    ReactionsHeartDesc,
    #[strum(serialize = "reactions-hooray-desc")]
    #[serde(rename = "reactions-hooray-desc")]
    ReactionsHoorayDesc,
    #[strum(serialize = "reactions-rocket-desc")]
    #[serde(rename = "reactions-rocket-desc")]
    ReactionsRocketDesc,
    #[strum(serialize = "reactions-eyes-desc")]
    #[serde(rename = "reactions-eyes-desc")]
    ReactionsEyesDesc,
}

impl SortKey {
    /// Parse a raw `sort:` value, falling back to the default for anything unknown
    pub fn parse_or_default(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }

    /// Resolve the key to the field and direction that implement it
    pub fn resolve(self) -> (SortField, SortOrder) {
        use SortField::*;
        use SortOrder::*;

        match self {
            SortKey::CreatedAsc => (CreatedAt, Ascending),
            SortKey::CreatedDesc | SortKey::RelevanceDesc => (CreatedAt, Descending),
            SortKey::UpdatedAsc => (UpdatedAt, Ascending),
            SortKey::UpdatedDesc => (UpdatedAt, Descending),
            SortKey::CommentsAsc => (Comments, Ascending),
            SortKey::CommentsDesc => (Comments, Descending),
            SortKey::ReactionsThumbsUpDesc => (Reactions(ReactionKind::ThumbsUp), Descending),
            SortKey::ReactionsThumbsDownDesc => (Reactions(ReactionKind::ThumbsDown), Descending),
            SortKey::ReactionsLaughDesc => (Reactions(ReactionKind::Laugh), Descending),
            SortKey::ReactionsConfusedDesc => (Reactions(ReactionKind::Confused), Descending),
            SortKey::ReactionsHeartDesc => (Reactions(ReactionKind::Heart), Descending),
            SortKey::ReactionsHoorayDesc => (Reactions(ReactionKind::Hooray), Descending),
            SortKey::ReactionsRocketDesc => (Reactions(ReactionKind::Rocket), Descending),
            SortKey::ReactionsEyesDesc => (Reactions(ReactionKind::Eyes), Descending),
        }
    }

    /// Compare two issues under this key.
    ///
    /// Ties fall back to newest-first creation time, then id, so pagination is stable.
    pub fn compare(self, a: &Issue, b: &Issue) -> Ordering {
        let (field, order) = self.resolve();

        let primary = match field {
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            SortField::Comments => a.comment_count().cmp(&b.comment_count()),
            SortField::Reactions(kind) => a.reaction_count(kind).cmp(&b.reaction_count(kind)),
        };

        let primary = match order {
            SortOrder::Ascending => primary,
            SortOrder::Descending => primary.reverse(),
        };

        primary
            .then_with(|| b.created_at.cmp(&a.created_at))
            .then_with(|| a.id.cmp(&b.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use strum::IntoEnumIterator;

    #[test]
    fn test_exactly_fourteen_keys() {
        assert_eq!(SortKey::iter().count(), 14);
    }

    #[test]
    fn test_keys_parse_from_their_display_form() {
        for key in SortKey::iter() {
            assert_eq!(SortKey::parse_or_default(&key.to_string()), key);
        }
    }

    #[test]
    fn test_unknown_key_falls_back_to_created_desc() {
        assert_eq!(SortKey::parse_or_default("bogus"), SortKey::CreatedDesc);
        assert_eq!(SortKey::parse_or_default(""), SortKey::CreatedDesc);
        assert_eq!(SortKey::default(), SortKey::CreatedDesc);
    }

    #[test]
    fn test_relevance_resolves_to_recency() {
        assert_eq!(SortKey::RelevanceDesc.resolve(), SortKey::CreatedDesc.resolve());
    }

    #[test]
    fn test_reaction_sort_puts_unset_counts_last() {
        let now = Utc::now();
        let none = Issue::new(1, "a", "none", "").with_created_at(now);
        let some = Issue::new(2, "a", "some", "")
            .with_created_at(now - Duration::days(1))
            .with_reaction(ReactionKind::Rocket, 2);
        let zero = Issue::new(3, "a", "zero", "")
            .with_created_at(now + Duration::days(1))
            .with_reaction(ReactionKind::Rocket, 0);

        let mut issues = vec![none, zero, some];
        issues.sort_by(|a, b| SortKey::ReactionsRocketDesc.compare(a, b));

        assert_eq!(issues[0].title, "some");
    }

    #[test]
    fn test_comments_ascending() {
        let mut busy = Issue::new(1, "a", "busy", "");
        busy.add_comment("b", "one");
        busy.add_comment("c", "two");
        let quiet = Issue::new(2, "a", "quiet", "");

        assert_eq!(SortKey::CommentsAsc.compare(&quiet, &busy), Ordering::Less);
        assert_eq!(SortKey::CommentsDesc.compare(&quiet, &busy), Ordering::Greater);
    }
}
