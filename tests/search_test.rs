//! End-to-end tests for the issue filter language

mod common;

use common::{label_fixture, service, tracker_fixture};
use issue_search::search::*;
use issue_search::state::IssueCorpus;

async fn numbers(service: &SearchService, query: &str, actor: Option<&str>) -> Vec<u64> {
    let mut request = SearchRequest::new(query).with_page(0, 100);
    request.actor = actor.map(str::to_string);

    service
        .search(&request)
        .await
        .unwrap()
        .issues
        .into_iter()
        .map(|issue| issue.number)
        .collect()
}

fn sorted(mut values: Vec<u64>) -> Vec<u64> {
    values.sort();
    values
}

#[test]
fn test_round_trip_preserves_effective_predicates() {
    let queries = [
        "",
        "is:closed reason:not-planned",
        r#"label:"bug" label:"area: auth" -label:wontfix"#,
        "assignee:alice,@me -assignee:bob author:carol",
        "-author:dave mentions:erin -mentions:frank",
        "no:label no:assignee in:title,comments crash report",
        "sort:reactions-+1-desc is:open",
        r#"author:"odd name" hello"#,
    ];

    for query in queries {
        let filters = IssueFilters::parse(query);
        let reparsed = IssueFilters::parse(&serialize(&filters));

        for actor in [None, Some("alice")] {
            assert_eq!(
                compile(&reparsed, actor, CompileOptions::default()),
                compile(&filters, actor, CompileOptions::default()),
                "query {query:?} serialized as {:?}",
                serialize(&filters)
            );
        }
    }
}

#[test]
fn test_invalid_status_defaults_to_open() {
    let filters = IssueFilters::parse("is:bogus");
    assert_eq!(filters.is, Some(IssueState::Open));
    assert_eq!(serialize(&filters), "is:open");
}

#[test]
fn test_empty_query_sorts_newest_first() {
    let plan = compile(&IssueFilters::parse(""), None, CompileOptions::default());
    assert_eq!(plan.sort, SortKey::CreatedDesc);
}

#[tokio::test]
async fn test_conjunctive_labels() {
    let service = service(label_fixture()).await;
    assert_eq!(numbers(&service, r#"label:"bug" label:"urgent""#, None).await, vec![2]);
    assert_eq!(numbers(&service, r#"label:"bug,urgent""#, None).await, Vec::<u64>::new());
    assert_eq!(numbers(&service, "label:bug,urgent", None).await, vec![2]);
}

#[tokio::test]
async fn test_negative_labels_exclude_only_full_matches() {
    let service = service(label_fixture()).await;
    assert_eq!(
        sorted(numbers(&service, r#"-label:"bug" -label:"urgent""#, None).await),
        vec![1, 3]
    );
    assert_eq!(sorted(numbers(&service, "-label:bug", None).await), vec![3]);
}

#[tokio::test]
async fn test_no_label_short_circuits() {
    let service = service(tracker_fixture()).await;
    let with_list = numbers(&service, r#"no:label label:"bug""#, None).await;
    assert_eq!(with_list, numbers(&service, "no:label", None).await);
    assert_eq!(with_list, vec![14]);
}

#[tokio::test]
async fn test_no_assignee() {
    let service = service(tracker_fixture()).await;
    assert_eq!(sorted(numbers(&service, "no:assignee", None).await), vec![11, 14]);
}

#[tokio::test]
async fn test_mentions_me_without_actor_is_ignored() {
    let service = service(tracker_fixture()).await;
    assert_eq!(
        numbers(&service, "mentions:@me", None).await,
        numbers(&service, "", None).await
    );
    assert_eq!(numbers(&service, "mentions:@me", Some("alice")).await, vec![11]);
    assert_eq!(numbers(&service, "mentions:@me", Some("@Carol")).await, vec![10]);
    assert_eq!(
        sorted(numbers(&service, "-mentions:carol", None).await),
        vec![11, 14]
    );
}

#[tokio::test]
async fn test_default_sort_is_created_desc() {
    let service = service(tracker_fixture()).await;
    assert_eq!(numbers(&service, "", None).await, vec![14, 11, 10]);
    assert_eq!(numbers(&service, "sort:created-asc", None).await, vec![10, 11, 14]);
    assert_eq!(
        numbers(&service, "sort:relevance-desc", None).await,
        numbers(&service, "", None).await
    );
}

#[tokio::test]
async fn test_reaction_and_comment_sorts() {
    let service = service(tracker_fixture()).await;
    assert_eq!(numbers(&service, "sort:reactions-+1-desc", None).await, vec![11, 10, 14]);
    assert_eq!(numbers(&service, "sort:comments-desc", None).await[0], 11);
}

#[tokio::test]
async fn test_text_scopes() {
    let service = service(tracker_fixture()).await;
    assert_eq!(sorted(numbers(&service, "crash", None).await), vec![10, 11]);
    assert_eq!(numbers(&service, "in:title crash", None).await, vec![10]);
    assert_eq!(numbers(&service, "in:comments CRASH", None).await, vec![11]);
    assert_eq!(numbers(&service, "in:body trace", None).await, vec![10]);
}

#[tokio::test]
async fn test_status_filters() {
    let service = service(tracker_fixture()).await;
    assert_eq!(sorted(numbers(&service, "is:closed", None).await), vec![12, 13]);
    assert_eq!(numbers(&service, "is:closed reason:completed", None).await, vec![12]);
    assert_eq!(numbers(&service, "is:closed reason:not-planned", None).await, vec![13]);
}

#[tokio::test]
async fn test_users_are_case_insensitive() {
    let service = service(tracker_fixture()).await;
    assert_eq!(numbers(&service, "author:@me", Some("ALICE")).await, vec![10]);
    assert_eq!(numbers(&service, "assignee:BOB", None).await, vec![10]);
    assert_eq!(
        numbers(&service, "is:closed assignee:alice,%carol", None).await,
        vec![12]
    );
    assert_eq!(sorted(numbers(&service, "-author:alice", None).await), vec![11, 14]);
}

#[tokio::test]
async fn test_labels_with_spaces() {
    let service = service(tracker_fixture()).await;
    assert_eq!(numbers(&service, r#"label:"area: auth""#, None).await, vec![10]);
    assert_eq!(numbers(&service, r#"label:"Area: Auth""#, None).await, Vec::<u64>::new());
}

#[tokio::test]
async fn test_aggregation_ignores_status() {
    let service = service(tracker_fixture()).await;

    for base in ["", "crash", "no:label", "-author:erin"] {
        let expected = service.counts(base, None).await.unwrap();
        assert_eq!(
            expected.open_count + expected.completed_count + expected.not_planned_count,
            expected.total_count
        );

        for status in ["is:open", "is:closed", "is:closed reason:completed", "is:closed reason:not-planned"] {
            let counts = service.counts(&format!("{status} {base}"), None).await.unwrap();
            assert_eq!(counts, expected, "{status} {base}");
        }
    }

    let all = service.counts("", None).await.unwrap();
    assert_eq!(
        all,
        StatusCounts {
            total_count: 5,
            open_count: 3,
            completed_count: 1,
            not_planned_count: 1,
        }
    );
}

#[tokio::test]
async fn test_counts_are_independent_of_pagination() {
    let service = service(tracker_fixture()).await;
    let response = service
        .search(&SearchRequest::new("").with_page(5, 1))
        .await
        .unwrap();

    assert!(response.issues.is_empty());
    assert_eq!(response.total_count, 3);
    assert_eq!(response.counts.total_count, 5);
}

#[tokio::test]
async fn test_deleted_issue_leaves_indexes() {
    let issues = tracker_fixture();
    let login_id = issues[0].id;
    let service = service(issues).await;

    service.corpus().delete_issue(&login_id).await.unwrap();

    assert_eq!(numbers(&service, "label:bug", None).await, Vec::<u64>::new());
    assert_eq!(numbers(&service, "mentions:carol", None).await, Vec::<u64>::new());
}
