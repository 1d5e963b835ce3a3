//! Fixed local paths and derived output file names.

use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Fixed locations
// ---------------------------------------------------------------------------

/// Registry log mapping sequence ids to batch jobs.
pub const REGISTRY_PATH: &str = "config/openai_batch_config.jsonl";

/// Directory for verbatim batch output files.
pub const RAW_OUTPUT_DIR: &str = "outputs/raw";

/// Directory for flattened output files.
pub const PROCESSED_OUTPUT_DIR: &str = "outputs/processed";

/// Execution log shared by both binaries.
pub const EXECUTION_LOG: &str = "execution.log";

// ---------------------------------------------------------------------------
// Derived file names
// ---------------------------------------------------------------------------

/// Path for the verbatim output of a batch job:
/// `outputs/raw/batch_raw_{data}_{version}_{date}.jsonl`.
pub fn raw_output_path(data: &str, version: &str, date: &str) -> PathBuf {
    PathBuf::from(RAW_OUTPUT_DIR).join(format!("batch_raw_{data}_{version}_{date}.jsonl"))
}

/// Path of the flattened counterpart of `raw_path`:
/// `outputs/processed/processed_{raw file stem}.jsonl`.
pub fn processed_output_path(raw_path: &Path) -> PathBuf {
    let stem = raw_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    PathBuf::from(PROCESSED_OUTPUT_DIR).join(format!("processed_{stem}.jsonl"))
}
