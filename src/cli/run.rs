//! The full indexing run: load, normalize, embed, upsert.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::Cli;
use crate::cli::output::{self, RunStats};
use crate::models::{Config, ENV_OPENAI_API_KEY, ENV_PINECONE_API_KEY, SourceTag, require_env};
use crate::services::{EmbeddingClient, VectorStoreClient, batch_count, process_batch};
use crate::sources::load_and_normalize;
use crate::utils::retry::{RetryConfig, with_retry};

/// Drive the whole pipeline. Batches run strictly in order; the first
/// unhandled error aborts the run. Re-running upserts the same ids again,
/// which is harmless.
pub async fn handle_run(cli: Cli) -> Result<()> {
    let mut config = Config::load().context("failed to load configuration")?;
    apply_overrides(&mut config, &cli);
    config.validate()?;

    let start_time = Instant::now();

    let jobs_path = Path::new(&config.indexing.jobs_path);
    let opportunities_path = Path::new(&config.indexing.opportunities_path);

    // Jobs first, then opportunities; ids are unique per source prefix
    let mut records = load_and_normalize(jobs_path, SourceTag::TmcfJobs)?;
    let jobs_count = records.len() as u64;
    let opportunities = load_and_normalize(opportunities_path, SourceTag::UncfOpportunities)?;
    let opportunities_count = opportunities.len() as u64;
    records.extend(opportunities);

    let mut stats = RunStats {
        jobs: jobs_count,
        opportunities: opportunities_count,
        ..Default::default()
    };

    if cli.validate_only {
        output::validation_summary(&stats);
        return Ok(());
    }

    if cli.verbose {
        output::source_counts(jobs_count, opportunities_count);
    }

    let openai_key = require_env(ENV_OPENAI_API_KEY)?;
    let pinecone_key = require_env(ENV_PINECONE_API_KEY)?;

    let embedding_client = EmbeddingClient::new(&config.embedding, openai_key)?;
    let vector_client = VectorStoreClient::new(&config.vector_store, pinecone_key)?;

    let (handle, created) = vector_client
        .ensure_index(config.embedding.dimension)
        .await
        .context("failed to ensure index")?;
    if created {
        output::status(&format!("Index '{}' created.", handle.name));
    } else {
        output::status(&format!("Index '{}' already exists.", handle.name));
    }

    let batch_size = config.indexing.batch_size as usize;
    let total_batches = batch_count(records.len(), batch_size);
    let retry_config = RetryConfig::from(&config.retry);

    let bar = ProgressBar::new(total_batches as u64);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} batches {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let embedding = &embedding_client;
    let vectors = &vector_client;
    let index_handle = &handle;

    for (i, batch) in records.chunks(batch_size).enumerate() {
        let upserted = with_retry(&retry_config, move || {
            process_batch(embedding, vectors, index_handle, batch)
        })
        .await
        .with_context(|| format!("batch {} of {} failed", i + 1, total_batches))?;

        stats.batches += 1;
        stats.vectors_upserted += upserted;
        bar.println(format!(
            "Upserted batch {}/{} ({} vectors)",
            i + 1,
            total_batches,
            upserted
        ));
        bar.inc(1);
    }

    bar.finish_and_clear();
    stats.duration_ms = start_time.elapsed().as_millis() as u64;

    print!("{}", output::completion_summary(&handle.name, &stats));

    Ok(())
}

/// CLI flags override the file/env configuration.
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(ref jobs) = cli.jobs {
        config.indexing.jobs_path = jobs.to_string_lossy().into_owned();
    }
    if let Some(ref opportunities) = cli.opportunities {
        config.indexing.opportunities_path = opportunities.to_string_lossy().into_owned();
    }
    if let Some(batch_size) = cli.batch_size {
        config.indexing.batch_size = batch_size;
    }
    if let Some(ref index) = cli.index {
        config.vector_store.index = index.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_apply_overrides() {
        let mut config = Config::default();
        let cli = Cli {
            jobs: Some(PathBuf::from("/tmp/jobs.json")),
            opportunities: None,
            batch_size: Some(50),
            index: Some("test-index".to_string()),
            validate_only: false,
            verbose: false,
        };
        apply_overrides(&mut config, &cli);
        assert_eq!(config.indexing.jobs_path, "/tmp/jobs.json");
        assert_eq!(
            config.indexing.opportunities_path,
            "./data/uncf_opportunities.json"
        );
        assert_eq!(config.indexing.batch_size, 50);
        assert_eq!(config.vector_store.index, "test-index");
    }
}
