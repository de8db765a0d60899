//! Prometheus metrics for the search engine.
//!
//! ```no_run
//! use issue_search::metrics::QUERIES_TOTAL;
//!
//! QUERIES_TOTAL.with_label_values(&["search"]).inc();
//! ```

use lazy_static::lazy_static;
use prometheus::{CounterVec, Histogram, HistogramOpts, HistogramVec, Opts, Registry};

const NAMESPACE: &str = "issue_search";

lazy_static! {
    /// Global Prometheus registry for all metrics
    pub static ref PROMETHEUS_REGISTRY: Registry = Registry::new();

    /// Queries handled
    ///
    /// Labels: endpoint (search, counts, parse)
    pub static ref QUERIES_TOTAL: CounterVec = CounterVec::new(
        Opts::new("queries_total", "Total number of search queries handled")
            .namespace(NAMESPACE),
        &["endpoint"]
    ).expect("Failed to create QUERIES_TOTAL metric");

    /// Parse cache lookups
    ///
    /// Labels: result (hit, miss)
    pub static ref PARSE_CACHE_LOOKUPS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("parse_cache_lookups_total", "Parse cache lookups by result")
            .namespace(NAMESPACE),
        &["result"]
    ).expect("Failed to create PARSE_CACHE_LOOKUPS_TOTAL metric");

    /// End-to-end query latency, corpus execution included
    ///
    /// Labels: endpoint
    pub static ref QUERY_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new("query_duration_seconds", "Query duration in seconds")
            .namespace(NAMESPACE)
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
        &["endpoint"]
    ).expect("Failed to create QUERY_DURATION_SECONDS metric");

    /// Number of top-level predicates in compiled plans
    pub static ref PREDICATES_PER_PLAN: Histogram = Histogram::with_opts(
        HistogramOpts::new("predicates_per_plan", "Top-level predicates per compiled plan")
            .namespace(NAMESPACE)
            .buckets(vec![0.0, 1.0, 2.0, 3.0, 4.0, 6.0, 8.0, 12.0])
    ).expect("Failed to create PREDICATES_PER_PLAN metric");
}

/// Register all metrics with the global registry. Safe to call more than once.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    register(Box::new(QUERIES_TOTAL.clone()))?;
    register(Box::new(PARSE_CACHE_LOOKUPS_TOTAL.clone()))?;
    register(Box::new(QUERY_DURATION_SECONDS.clone()))?;
    register(Box::new(PREDICATES_PER_PLAN.clone()))?;

    tracing::debug!("Prometheus metrics registered");
    Ok(())
}

fn register(collector: Box<dyn prometheus::core::Collector>) -> Result<(), prometheus::Error> {
    match PROMETHEUS_REGISTRY.register(collector) {
        Ok(()) | Err(prometheus::Error::AlreadyReg) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Encode the registry in Prometheus text format
pub fn gather_metrics() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = PROMETHEUS_REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::from("# Error encoding metrics\n");
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Failed to convert metrics to string: {}", e);
        String::from("# Error converting metrics\n")
    })
}
