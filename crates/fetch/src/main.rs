//! `batchgen-fetch` -- retrieve a submitted batch job's output by fid,
//! save the raw bytes, and flatten them into reduced records.

use std::path::Path;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use batchgen_core::paths;
use batchgen_openai::OpenAIApi;

#[derive(Debug, Parser)]
#[command(
    name = "batchgen-fetch",
    about = "Fetch and flatten the output of a recorded OpenAI batch job"
)]
struct Args {
    /// OpenAI API key.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Sequence id of the registry entry to fetch.
    #[arg(long)]
    fid: u64,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_logging();

    let args = Args::parse();
    let api = OpenAIApi::new(args.api_key);

    match batchgen_fetch::run(&api, Path::new(paths::REGISTRY_PATH), args.fid).await {
        Ok(outcome) => {
            tracing::info!(
                raw = %outcome.raw_path.display(),
                processed = %outcome.processed_path.display(),
                records = outcome.record_count,
                "Batch output processing completed"
            );
        }
        Err(e) => {
            tracing::error!("Batch output processing failed: {e:#}");
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
                .unwrap_or_else(|_| "batchgen_fetch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();
}
