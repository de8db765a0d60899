//! Shared fixtures for integration tests

#![allow(dead_code)]

use chrono::{Duration, TimeZone, Utc};
use issue_search::models::{Issue, IssueStatus, ReactionKind};
use issue_search::search::{SearchConfig, SearchService};
use issue_search::state::InMemoryCorpus;
use std::collections::HashMap;
use std::sync::Arc;

/// Issue with fixed timestamps `day` days after a common epoch
pub fn issue(number: u64, author: &str, title: &str, day: i64) -> Issue {
    let epoch = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    Issue::new(number, author, title, "").with_created_at(epoch + Duration::days(day))
}

/// The A/B/C label fixture: A {bug}, B {bug, urgent}, C {urgent}
pub fn label_fixture() -> Vec<Issue> {
    vec![
        issue(1, "alice", "A", 1).with_labels(["bug"]),
        issue(2, "bob", "B", 2).with_labels(["bug", "urgent"]),
        issue(3, "carol", "C", 3).with_labels(["urgent"]),
    ]
}

/// A small tracker with every status, assignees, mentions and reactions
pub fn tracker_fixture() -> Vec<Issue> {
    let mut login = issue(10, "alice", "Login page crashes", 1)
        .with_labels(["bug", "area: auth"])
        .with_assignees(["bob"])
        .with_reaction(ReactionKind::ThumbsUp, 5);
    login.body = "Stack trace attached, cc @carol".to_string();

    let mut export = issue(11, "bob", "Export is slow", 2)
        .with_labels(["performance"])
        .with_reaction(ReactionKind::ThumbsUp, 12);
    export.add_comment("dave", "Profiling shows the crash handler is hot, @alice FYI");

    let docs = issue(12, "carol", "Document the crash reporter", 3)
        .with_labels(["docs"])
        .with_assignees(["alice", "carol"])
        .with_status(IssueStatus::Closed);

    let wontfix = issue(13, "dave", "Support IE6", 4)
        .with_labels(["enhancement"])
        .with_status(IssueStatus::NotPlanned);

    let triage = issue(14, "erin", "Untriaged report", 5);

    vec![login, export, docs, wontfix, triage]
}

pub async fn corpus(issues: Vec<Issue>) -> InMemoryCorpus {
    InMemoryCorpus::with_issues(issues).await.unwrap()
}

pub async fn service(issues: Vec<Issue>) -> SearchService {
    SearchService::new(Arc::new(corpus(issues).await), SearchConfig::default()).unwrap()
}

/// Parse Prometheus exposition text into metric name -> lines
pub fn parse_prometheus_output(output: &str) -> HashMap<String, Vec<String>> {
    let mut metrics = HashMap::new();
    let mut current_metric = String::new();

    for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if line.starts_with("# HELP") || line.starts_with("# TYPE") {
            if let Some(name) = line.split_whitespace().nth(2) {
                current_metric = name.to_string();
                metrics.entry(current_metric.clone()).or_insert_with(Vec::new).push(line.to_string());
            }
        } else if !line.starts_with('#') && !current_metric.is_empty() {
            metrics.entry(current_metric.clone()).or_insert_with(Vec::new).push(line.to_string());
        }
    }

    metrics
}
