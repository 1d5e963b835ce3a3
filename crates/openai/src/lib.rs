//! Minimal client for the OpenAI batch API.
//!
//! Wraps the four operations the batchgen binaries need: input file
//! upload, batch creation, batch retrieval, and output file download.

mod api;

pub use api::{BatchJob, OpenAIApi, OpenAIApiError, UploadedFile, DEFAULT_BASE_URL};
