use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use strum::{Display, EnumIter, EnumString};
use uuid::Uuid;
use validator::Validate;

lazy_static! {
    /// `@` flanked by start-of-text or a non-alphanumeric character, then a run of
    /// username characters
    static ref MENTION: Regex =
        Regex::new(r"(?:^|[^\p{L}\p{N}])@([\p{L}\p{N}][\p{L}\p{N}_.-]*)").expect("mention pattern is valid");
}

/// Usernames mentioned in `text`, lowercased.
///
/// Each `@run` yields every prefix that ends at a word boundary, so `@alice-bob`
/// mentions both `alice` and `alice-bob`.
pub fn extract_mentions(text: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();

    for run in MENTION.captures_iter(text).filter_map(|caps| caps.get(1)) {
        let run = run.as_str().to_lowercase();
        let mut chars = run.char_indices().peekable();

        while let Some((at, c)) = chars.next() {
            let at_boundary = chars.peek().map_or(true, |(_, next)| !next.is_alphanumeric());
            if at_boundary {
                names.insert(run[..at + c.len_utf8()].to_string());
            }
        }
    }

    names
}

/// A tracked issue as stored in the corpus
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Issue {
    /// Unique identifier
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// Human-facing issue number
    #[serde(default)]
    pub number: u64,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,

    /// Current status
    #[serde(default)]
    pub status: IssueStatus,

    /// Username of the reporter
    #[validate(length(min = 1, max = 255))]
    pub author: String,

    /// Human-readable title
    #[validate(length(min = 1, max = 500))]
    pub title: String,

    /// Markdown body
    #[serde(default)]
    pub body: String,

    /// Label names
    #[serde(default)]
    pub labels: BTreeSet<String>,

    /// Assigned usernames
    #[serde(default)]
    pub assignees: BTreeSet<String>,

    /// Discussion thread
    #[serde(default)]
    pub comments: Vec<Comment>,

    /// Reaction counts on the issue body
    #[serde(default)]
    pub reactions: HashMap<ReactionKind, u32>,
}

impl Issue {
    /// Create a new open issue
    pub fn new(number: u64, author: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            number,
            created_at: now,
            updated_at: now,
            status: IssueStatus::Open,
            author: author.into(),
            title: title.into(),
            body: body.into(),
            labels: BTreeSet::new(),
            assignees: BTreeSet::new(),
            comments: Vec::new(),
            reactions: HashMap::new(),
        }
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels.extend(labels.into_iter().map(Into::into));
        self
    }

    pub fn with_assignees<I, S>(mut self, assignees: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assignees.extend(assignees.into_iter().map(Into::into));
        self
    }

    pub fn with_status(mut self, status: IssueStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        if self.updated_at < created_at {
            self.updated_at = created_at;
        }
        self
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    pub fn with_reaction(mut self, kind: ReactionKind, count: u32) -> Self {
        self.reactions.insert(kind, count);
        self
    }

    /// Append a comment and bump `updated_at`
    pub fn add_comment(&mut self, author: impl Into<String>, body: impl Into<String>) {
        let now = Utc::now();
        self.comments.push(Comment {
            author: author.into(),
            body: body.into(),
            created_at: now,
        });
        self.updated_at = now;
    }

    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    /// Count for a reaction kind; missing entries count as zero
    pub fn reaction_count(&self, kind: ReactionKind) -> u32 {
        self.reactions.get(&kind).copied().unwrap_or(0)
    }

    /// Everyone mentioned in the body or any comment
    pub fn mentioned_users(&self) -> BTreeSet<String> {
        let mut users = extract_mentions(&self.body);
        for comment in &self.comments {
            users.extend(extract_mentions(&comment.body));
        }
        users
    }

    pub fn is_open(&self) -> bool {
        self.status == IssueStatus::Open
    }
}

/// A comment on an issue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Stored issue status. Closed issues carry their terminal reason in the variant.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, EnumString, Display, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueStatus {
    #[default]
    Open,
    Closed,
    NotPlanned,
}

/// Reaction kinds that can be counted and sorted on
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, EnumString, Display, EnumIter)]
pub enum ReactionKind {
    #[serde(rename = "+1")]
    #[strum(serialize = "+1")]
    ThumbsUp,
    #[serde(rename = "-1")]
    #[strum(serialize = "-1")]
    ThumbsDown,
    #[serde(rename = "laugh")]
    #[strum(serialize = "laugh")]
    Laugh,
    #[serde(rename = "confused")]
    #[strum(serialize = "confused")]
    Confused,
    #[serde(rename = "heart")]
    #[strum(serialize = "heart")]
    Heart,
    #[serde(rename = "hooray")]
    #[strum(serialize = "hooray")]
    Hooray,
    #[serde(rename = "rocket")]
    #[strum(serialize = "rocket")]
    Rocket,
    #[serde(rename = "eyes")]
    #[strum(serialize = "eyes")]
    Eyes,
}
