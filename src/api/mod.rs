pub mod handlers;
pub mod routes;

pub use routes::*;

use crate::search::SearchService;
use std::{sync::Arc, time::Duration};

/// Header an upstream authenticating proxy uses to name the current actor
pub const ACTOR_HEADER: &str = "x-actor";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub search: Arc<SearchService>,
    /// Requests running longer than this are answered with 408
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(search: Arc<SearchService>) -> Self {
        Self {
            search,
            request_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}
