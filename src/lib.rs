//! Issue search: a GitHub-style filter query language over an issue corpus.
//!
//! The [`search`] module holds the query engine (tokenizer, validator,
//! serializer, compiler, aggregator). [`state`] defines the corpus contract the
//! compiled plans run against and ships an in-memory implementation. [`api`]
//! exposes both over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod search;
pub mod state;

pub use error::{AppError, Result};
