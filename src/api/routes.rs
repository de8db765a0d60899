use crate::api::{handlers, AppState};
use axum::{routing::get, Router};
use std::time::Duration;
use tower_http::{
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Build the main API router
pub fn build_router(state: AppState) -> Router {
    let request_timeout = state.request_timeout;

    let router = Router::new()
        // Health endpoints
        .route("/health", get(handlers::health_check))
        .route("/health/live", get(handlers::health_check))
        .route("/health/ready", get(handlers::readiness_check))
        // Search
        .route("/v1/issues/search", get(handlers::search_issues))
        .route("/v1/issues/counts", get(handlers::issue_counts))
        .route("/v1/search/parse", get(handlers::parse_query))
        // Metrics
        .route("/metrics", get(handlers::metrics))
        // Add state
        .with_state(state);

    with_middleware(router, request_timeout)
}

fn with_middleware(router: Router, request_timeout: Duration) -> Router {
    router
        .layer(TimeoutLayer::new(request_timeout))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
}
