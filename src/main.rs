use anyhow::Context;
use issue_search::{
    api::{build_router, AppState},
    config::Config,
    search::SearchService,
    state::create_corpus,
};
use std::{sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration: {}", e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("issue_search={},tower_http=info", config.observability.log_level).into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.observability.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting issue-search v{}", env!("CARGO_PKG_VERSION"));

    // Initialize Prometheus metrics
    if config.observability.prometheus_enabled {
        if let Err(e) = issue_search::metrics::init_metrics() {
            tracing::warn!("Failed to initialize metrics: {}", e);
            tracing::warn!("Continuing without metrics");
        } else {
            tracing::info!("Prometheus metrics initialized");
        }
    } else {
        tracing::info!("Prometheus metrics disabled in configuration");
    }

    // Initialize corpus
    let corpus = create_corpus(&config.corpus)
        .await
        .context("failed to initialize issue corpus")?;
    tracing::info!(issues = corpus.len().await?, "Corpus ready");

    let search = SearchService::new(corpus, config.search.clone()).context("invalid search configuration")?;
    tracing::info!(
        default_state = ?config.search.default_state,
        cache_capacity = config.search.parse_cache_capacity,
        max_per_page = config.search.max_per_page,
        "Search service initialized"
    );

    let state = AppState::new(Arc::new(search))
        .with_request_timeout(Duration::from_secs(config.server.request_timeout_secs));
    let app = build_router(state);

    let http_addr = format!("{}:{}", config.server.host, config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("failed to bind {}", http_addr))?;

    tracing::info!("HTTP server listening on {}", http_addr);
    tracing::info!("   Search: http://{}/v1/issues/search?q=", http_addr);
    tracing::info!("   Metrics: http://{}/metrics", http_addr);

    tokio::select! {
        result = axum::serve(http_listener, app) => {
            if let Err(e) = result {
                tracing::error!("HTTP server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    tracing::info!("Shutting down gracefully...");
    Ok(())
}
