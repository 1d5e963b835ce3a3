//! `batchgen-submit` -- upload a JSONL input file, create an OpenAI
//! batch job, and append a tracking entry to the local registry log.

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use batchgen_core::paths;
use batchgen_openai::OpenAIApi;

#[derive(Debug, Parser)]
#[command(
    name = "batchgen-submit",
    about = "Submit an OpenAI batch job and record it in the registry log"
)]
struct Args {
    /// OpenAI API key.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Data label recorded in the registry entry.
    #[arg(long)]
    data: String,

    /// Version tag recorded in the registry entry.
    #[arg(long)]
    version: String,

    /// Path to the newline-delimited JSON input file.
    #[arg(long)]
    input_file: PathBuf,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_logging();

    let args = Args::parse();
    let api = OpenAIApi::new(args.api_key);

    match batchgen_submit::run(
        &api,
        Path::new(paths::REGISTRY_PATH),
        &args.data,
        &args.version,
        &args.input_file,
    )
    .await
    {
        Ok(entry) => {
            tracing::info!(
                fid = entry.fid,
                batch_job_id = %entry.batch_job_id,
                "Submission complete"
            );
        }
        Err(e) => {
            tracing::error!("Submission failed: {e:#}");
            std::process::exit(1);
        }
    }
}

/// Log to stdout and to the shared execution log file.
fn init_logging() {
    let file_layer = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(paths::EXECUTION_LOG)
        .ok()
        .map(|file| {
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(std::sync::Arc::new(file))
        });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "batchgen_submit=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();
}
