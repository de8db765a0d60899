//! GitHub-style issue filter language.
//!
//! A query such as `is:open label:"bug" assignee:alice sort:comments-desc crash`
//! flows through these stages:
//!
//! ```text
//! raw text ─► lexer::tokenize ─► RawFilters ─► filter::validate ─► IssueFilters
//!                                                                      │
//!                           ┌──────────────────────────────────────────┤
//!                           ▼                                          ▼
//!                 serialize::serialize                        compiler::compile
//!                  (canonical text)                          (QueryPlan + SortKey)
//!                                                                      │
//!                                                                      ▼
//!                                                   IssueCorpus ─► aggregate (StatusCounts)
//! ```
//!
//! Everything up to the corpus is pure and infallible. Bad input degrades:
//! unknown keys become free text and invalid enum values fall back to their
//! defaults.
//!
//! # Example
//!
//! ```no_run
//! use issue_search::search::{SearchConfig, SearchRequest, SearchService};
//! use issue_search::state::InMemoryCorpus;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let corpus = Arc::new(InMemoryCorpus::new());
//!     let search = SearchService::new(corpus, SearchConfig::default())?;
//!
//!     let request = SearchRequest::new("is:open label:bug crash").with_actor("alice");
//!     let response = search.search(&request).await?;
//!     println!("{} open, {} closed", response.counts.open_count, response.counts.closed_count());
//!
//!     Ok(())
//! }
//! ```

mod aggregate;
mod cache;
mod compiler;
mod config;
mod filter;
mod lexer;
mod serialize;
mod service;
mod sort;

pub use aggregate::{count_by_status, StatusCounts};
pub use cache::ParseCache;
pub use compiler::{compile, Association, CompileOptions, Predicate, QueryPlan};
pub use config::{SearchConfig, SearchConfigBuilder};
pub use filter::{
    validate, CloseReason, FilterDefaults, IssueFilters, IssueState, NoFilter, TextScope, CURRENT_ACTOR,
};
pub use lexer::{lex, tokenize, FilterKey, RawFilters};
pub use serialize::serialize;
pub use service::{ParsedQuery, SearchRequest, SearchResponse, SearchService};
pub use sort::{SortField, SortKey, SortOrder};
