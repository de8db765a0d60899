use crate::config::CorpusConfig;
use crate::error::{AppError, Result};
use crate::models::Issue;
use crate::state::{InMemoryCorpus, IssueCorpus};
use std::path::Path;
use std::sync::Arc;

/// Create the issue corpus, seeding it from `seed_path` when configured
pub async fn create_corpus(config: &CorpusConfig) -> Result<Arc<dyn IssueCorpus>> {
    let corpus = match &config.seed_path {
        Some(path) => {
            tracing::info!(path = ?path, "Seeding in-memory corpus");

            let issues = load_issues(path)?;
            let count = issues.len();
            let corpus = InMemoryCorpus::with_issues(issues).await?;

            tracing::info!(issues = count, "Corpus seeded");
            corpus
        }
        None => {
            tracing::info!("Initializing empty in-memory corpus");
            InMemoryCorpus::new()
        }
    };

    Ok(Arc::new(corpus))
}

/// Read an array of issues from a `.json`, `.yaml` or `.yml` file
pub fn load_issues(path: impl AsRef<Path>) -> Result<Vec<Issue>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("json") => Ok(serde_json::from_str(&contents)?),
        Some("yaml") | Some("yml") => Ok(serde_yaml::from_str(&contents)?),
        _ => Err(AppError::Configuration(format!(
            "Unsupported seed file format: {}",
            path.display()
        ))),
    }
}
