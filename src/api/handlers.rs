use crate::api::{AppState, ACTOR_HEADER};
use crate::error::Result;
use crate::search::{ParsedQuery, SearchRequest, SearchResponse, StatusCounts};
use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};

/// Health check endpoint
pub async fn health_check() -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        issues: None,
    }))
}

/// Readiness: the corpus answers
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    let issues = state.search.corpus().len().await?;

    Ok(Json(HealthResponse {
        status: "ready".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        issues: Some(issues),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Raw query text
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub page: u32,
    pub per_page: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QueryParams {
    #[serde(default)]
    pub q: String,
}

/// Search issues
pub async fn search_issues(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>> {
    let request = SearchRequest {
        query: params.q,
        actor: actor(&headers),
        page: params.page,
        per_page: params.per_page,
        any_state: false,
    };

    let response = state.search.search(&request).await?;
    Ok(Json(response))
}

/// Status-tab counts for a query
pub async fn issue_counts(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<QueryParams>,
) -> Result<Json<StatusCounts>> {
    let actor = actor(&headers);
    let counts = state.search.counts(&params.q, actor.as_deref()).await?;
    Ok(Json(counts))
}

/// Parse a query without running it
pub async fn parse_query(State(state): State<AppState>, Query(params): Query<QueryParams>) -> Json<ParsedQuery> {
    Json(state.search.parse(&params.q))
}

/// Prometheus metrics endpoint
///
/// Returns metrics in Prometheus text exposition format
pub async fn metrics() -> (StatusCode, String) {
    let metrics = crate::metrics::gather_metrics();
    (StatusCode::OK, metrics)
}

/// Current actor from the proxy-supplied header; blank or non-UTF-8 means anonymous
fn actor(headers: &HeaderMap) -> Option<String> {
    headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_actor_header() {
        let mut headers = HeaderMap::new();
        assert_eq!(actor(&headers), None);

        headers.insert(ACTOR_HEADER, HeaderValue::from_static("  alice "));
        assert_eq!(actor(&headers).as_deref(), Some("alice"));

        headers.insert(ACTOR_HEADER, HeaderValue::from_static(""));
        assert_eq!(actor(&headers), None);
    }
}
