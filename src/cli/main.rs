use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use issue_search::{
    config::CorpusConfig,
    search::{compile, serialize, CompileOptions, IssueFilters, SearchConfig, SearchRequest, SearchService},
    state::{create_corpus, IssueCorpus},
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "issue-search-cli")]
#[command(about = "Run issue filter queries offline against a seed file", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a query and print its filter model, canonical text and plan
    Parse {
        #[arg(value_name = "QUERY")]
        query: String,

        /// User `@me` resolves to
        #[arg(short, long)]
        actor: Option<String>,
    },

    /// Search a corpus file
    Search {
        #[arg(value_name = "QUERY")]
        query: String,

        /// JSON or YAML file holding an array of issues
        #[arg(short, long, env = "ISSUE_SEARCH_CORPUS")]
        corpus: PathBuf,

        #[arg(short, long)]
        actor: Option<String>,

        #[arg(short, long, default_value = "0")]
        page: u32,

        #[arg(short = 's', long)]
        per_page: Option<u32>,

        /// Do not default to open issues when the query has no `is:`
        #[arg(long)]
        any_state: bool,
    },

    /// Print status counts for a query
    Counts {
        #[arg(value_name = "QUERY")]
        query: String,

        #[arg(short, long, env = "ISSUE_SEARCH_CORPUS")]
        corpus: PathBuf,

        #[arg(short, long)]
        actor: Option<String>,
    },
}

async fn service(corpus: PathBuf) -> Result<SearchService> {
    let config = CorpusConfig {
        seed_path: Some(corpus.clone()),
    };
    let corpus: Arc<dyn IssueCorpus> = create_corpus(&config)
        .await
        .with_context(|| format!("failed to load corpus from {}", corpus.display()))?;

    SearchService::new(corpus, SearchConfig::default()).context("invalid search configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse { query, actor } => {
            let filters = IssueFilters::parse_with(&query, &SearchConfig::default().filter_defaults());
            let plan = compile(&filters, actor.as_deref(), CompileOptions::default());

            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "canonical_query": serialize(&filters),
                    "filters": filters,
                    "plan": plan,
                }))?
            );
        }

        Commands::Search {
            query,
            corpus,
            actor,
            page,
            per_page,
            any_state,
        } => {
            let service = service(corpus).await?;
            let request = SearchRequest {
                query,
                actor,
                page,
                per_page,
                any_state,
            };

            let response = service.search(&request).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Commands::Counts { query, corpus, actor } => {
            let service = service(corpus).await?;
            let counts = service.counts(&query, actor.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&counts)?);
        }
    }

    Ok(())
}
