//! Submission flow: upload an input file, create a batch job, record it.

use std::path::Path;

use anyhow::Context;

use batchgen_core::registry::{self, Registry, RegistryEntry};
use batchgen_openai::OpenAIApi;

/// Run the full submission flow.
///
/// Computes the next fid from the registry log, reads and uploads the
/// input file, creates the batch job, then appends one registry entry.
/// Nothing is appended if any earlier step fails.
pub async fn run(
    api: &OpenAIApi,
    registry_path: &Path,
    data: &str,
    version: &str,
    input_file: &Path,
) -> anyhow::Result<RegistryEntry> {
    let registry = Registry::new(registry_path);

    let fid = registry.next_fid().context("failed to scan registry log")?;
    let date = registry::submission_date();
    tracing::info!(fid, data, version, "Submitting batch job");

    let bytes = std::fs::read(input_file)
        .with_context(|| format!("failed to read input file {}", input_file.display()))?;
    let filename = input_file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("batch_input.jsonl");

    let uploaded = api
        .upload_batch_input(filename, bytes)
        .await
        .context("failed to create batch input file")?;
    tracing::info!(file_id = %uploaded.id, "Input file uploaded");

    // The tracking fields double as batch metadata on the remote side.
    let metadata = serde_json::json!({
        "fid": fid.to_string(),
        "data": data,
        "version": version,
        "date": date,
    });
    let job = api
        .create_batch(&uploaded.id, &metadata)
        .await
        .context("failed to create batch job")?;
    tracing::info!(batch_job_id = %job.id, status = %job.status, "Batch job created");

    let entry = RegistryEntry {
        fid,
        data: data.to_string(),
        version: version.to_string(),
        date,
        batch_job_id: job.id,
    };
    registry
        .append(&entry)
        .context("failed to append registry entry")?;
    tracing::info!(fid, path = %registry.path().display(), "Registry entry appended");

    Ok(entry)
}
