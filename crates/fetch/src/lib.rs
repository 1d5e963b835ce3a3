//! Retrieval flow: look up a batch job by fid, download its output
//! verbatim, and flatten it into reduced records.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};

use batchgen_core::flatten;
use batchgen_core::paths;
use batchgen_core::registry::Registry;
use batchgen_openai::OpenAIApi;

/// Files produced by a successful retrieval.
#[derive(Debug)]
pub struct FetchOutcome {
    pub raw_path: PathBuf,
    pub processed_path: PathBuf,
    pub record_count: usize,
}

/// Run the full retrieval flow for one registry entry.
///
/// Looks up the entry, retrieves the batch job, downloads its output
/// file, writes the bytes verbatim to the derived raw path, then
/// flattens them into the derived processed path. Any failure aborts
/// the whole flow; there is no retry.
pub async fn run(api: &OpenAIApi, registry_path: &Path, fid: u64) -> anyhow::Result<FetchOutcome> {
    tracing::info!(fid, "Loading batch configuration");
    let registry = Registry::new(registry_path);
    let entry = registry
        .find(fid)
        .context("failed to look up registry entry")?;
    tracing::info!(
        batch_job_id = %entry.batch_job_id,
        data = %entry.data,
        version = %entry.version,
        "Registry entry found"
    );

    tracing::info!("Retrieving batch job");
    let job = api
        .retrieve_batch(&entry.batch_job_id)
        .await
        .context("failed to retrieve batch job")?;
    let Some(output_file_id) = job.output_file_id else {
        bail!(
            "batch job {} has no output file yet (status: {})",
            job.id,
            job.status
        );
    };

    let output = api
        .file_content(&output_file_id)
        .await
        .context("failed to download batch output")?;

    let raw_path = paths::raw_output_path(&entry.data, &entry.version, &entry.date);
    write_verbatim(&raw_path, &output)?;
    tracing::info!(path = %raw_path.display(), bytes = output.len(), "Raw output saved");

    tracing::info!("Processing batch output");
    let processed_path = paths::processed_output_path(&raw_path);
    if let Some(parent) = processed_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let record_count = flatten::flatten_file(&raw_path, &processed_path)
        .context("failed to flatten batch output")?;
    tracing::info!(
        path = %processed_path.display(),
        records = record_count,
        "Processed output saved"
    );

    Ok(FetchOutcome {
        raw_path,
        processed_path,
        record_count,
    })
}

/// Write the downloaded bytes untouched, creating the raw output
/// directory on first use.
fn write_verbatim(raw_path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = raw_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(raw_path, bytes)
        .with_context(|| format!("failed to write {}", raw_path.display()))
}
