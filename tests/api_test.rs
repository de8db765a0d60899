//! HTTP API tests driving the router in-process

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use common::{parse_prometheus_output, service, tracker_fixture};
use issue_search::api::{build_router, AppState, ACTOR_HEADER};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

async fn app() -> Router {
    build_router(AppState::new(Arc::new(service(tracker_fixture()).await)))
}

async fn get(app: Router, uri: &str, actor: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder().uri(uri);
    if let Some(actor) = actor {
        request = request.header(ACTOR_HEADER, actor);
    }

    let response = app.oneshot(request.body(Body::empty()).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, body)
}

fn numbers(body: &Value) -> Vec<u64> {
    body["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|issue| issue["number"].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get(app().await, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = get(app().await, "/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["issues"], 5);
}

#[tokio::test]
async fn test_search_endpoint() {
    let (status, body) = get(app().await, "/v1/issues/search?q=label%3Abug", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(numbers(&body), vec![10]);
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["sort"], "created-desc");
    assert_eq!(body["canonical_query"], r#"is:open label:"bug""#);
    assert_eq!(body["counts"]["total_count"], 1);
}

#[tokio::test]
async fn test_search_without_query_lists_open_issues() {
    let (status, body) = get(app().await, "/v1/issues/search", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(numbers(&body), vec![14, 11, 10]);
    assert_eq!(body["per_page"], 25);
}

#[tokio::test]
async fn test_actor_header_resolves_me() {
    let uri = "/v1/issues/search?q=mentions%3A%40me";

    let (_, body) = get(app().await, uri, Some("alice")).await;
    assert_eq!(numbers(&body), vec![11]);

    let (_, body) = get(app().await, uri, None).await;
    assert_eq!(numbers(&body), vec![14, 11, 10]);
}

#[tokio::test]
async fn test_pagination_params() {
    let (status, body) = get(app().await, "/v1/issues/search?page=1&per_page=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(numbers(&body), vec![10]);
    assert_eq!(body["page"], 1);
    assert_eq!(body["total_count"], 3);

    let (_, body) = get(app().await, "/v1/issues/search?per_page=100000", None).await;
    assert_eq!(body["per_page"], 100);
}

#[tokio::test]
async fn test_malformed_pagination_is_rejected() {
    let (status, _) = get(app().await, "/v1/issues/search?page=minus-one", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_counts_endpoint() {
    let (status, body) = get(app().await, "/v1/issues/counts?q=is%3Aclosed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 5);
    assert_eq!(body["open_count"], 3);
    assert_eq!(body["completed_count"], 1);
    assert_eq!(body["not_planned_count"], 1);
}

#[tokio::test]
async fn test_parse_endpoint() {
    let (status, body) = get(
        app().await,
        "/v1/search/parse?q=is%3Abogus%20-label%3Adocs%20sort%3Anope%20hello",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["canonical_query"], r#"is:open -label:"docs" hello"#);
    assert_eq!(body["filters"]["is"], "open");
    assert_eq!(body["filters"]["sort"], "created-desc");
    assert_eq!(body["filters"]["excluded_labels"][0], "docs");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    issue_search::metrics::init_metrics().unwrap();
    get(app().await, "/v1/issues/search?q=crash", None).await;

    let response = app()
        .await
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let metrics = parse_prometheus_output(&String::from_utf8(bytes.to_vec()).unwrap());
    assert!(metrics.contains_key("issue_search_queries_total"));
    assert!(metrics.contains_key("issue_search_parse_cache_lookups_total"));
}
