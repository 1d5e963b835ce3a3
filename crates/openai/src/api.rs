//! REST API client for the OpenAI batch endpoints.
//!
//! Wraps file upload, batch creation/retrieval, and file content
//! download using [`reqwest`]. The API key is passed explicitly at
//! construction; the process environment is never mutated.

use serde::Deserialize;

/// Production OpenAI API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Endpoint every batch request in an input file targets.
const BATCH_ENDPOINT: &str = "/v1/chat/completions";

/// Completion window requested for new batch jobs.
const COMPLETION_WINDOW: &str = "24h";

/// HTTP client for the OpenAI batch API.
pub struct OpenAIApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Response from `POST /files` after uploading a batch input file.
#[derive(Debug, Deserialize)]
pub struct UploadedFile {
    /// Server-assigned file id, referenced when creating the batch.
    pub id: String,
    #[serde(default)]
    pub bytes: u64,
    #[serde(default)]
    pub filename: String,
}

/// Batch job as returned by `POST /batches` and `GET /batches/{id}`.
#[derive(Debug, Deserialize)]
pub struct BatchJob {
    /// Server-assigned batch job id.
    pub id: String,
    /// Lifecycle status (`validating`, `in_progress`, `completed`, ...).
    pub status: String,
    /// Output file id, present once the batch has completed.
    pub output_file_id: Option<String>,
    /// Error file id, present when individual requests failed.
    pub error_file_id: Option<String>,
}

/// Errors from the OpenAI REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum OpenAIApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// OpenAI returned a non-2xx status code.
    #[error("OpenAI API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl OpenAIApi {
    /// Create a client for the production endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a custom base URL (tests, gateways).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Upload a batch input file.
    ///
    /// Sends a multipart `POST /files` request with purpose `batch`.
    /// Returns the server-assigned file id.
    pub async fn upload_batch_input(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadedFile, OpenAIApiError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .text("purpose", "batch")
            .part("file", part);

        let response = self
            .client
            .post(format!("{}/files", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Create a batch job over a previously uploaded input file.
    ///
    /// Sends a `POST /batches` request targeting the chat completions
    /// endpoint with a 24h completion window. `metadata` is attached to
    /// the job verbatim (OpenAI requires string values).
    pub async fn create_batch(
        &self,
        input_file_id: &str,
        metadata: &serde_json::Value,
    ) -> Result<BatchJob, OpenAIApiError> {
        let body = serde_json::json!({
            "input_file_id": input_file_id,
            "endpoint": BATCH_ENDPOINT,
            "completion_window": COMPLETION_WINDOW,
            "metadata": metadata,
        });

        let response = self
            .client
            .post(format!("{}/batches", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Retrieve the current state of a batch job.
    ///
    /// Sends a `GET /batches/{id}` request. The returned job carries
    /// `output_file_id` once the batch has completed.
    pub async fn retrieve_batch(&self, batch_job_id: &str) -> Result<BatchJob, OpenAIApiError> {
        let response = self
            .client
            .get(format!("{}/batches/{}", self.base_url, batch_job_id))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Download a file's content verbatim.
    ///
    /// Sends a `GET /files/{id}/content` request and returns the raw
    /// response bytes without interpretation.
    pub async fn file_content(&self, file_id: &str) -> Result<Vec<u8>, OpenAIApiError> {
        let response = self
            .client
            .get(format!("{}/files/{}/content", self.base_url, file_id))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`OpenAIApiError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, OpenAIApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(OpenAIApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, OpenAIApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_uploaded_file_response() {
        let json = r#"{"id":"file-abc","object":"file","bytes":120,"filename":"input.jsonl","purpose":"batch"}"#;
        let uploaded: UploadedFile = serde_json::from_str(json).unwrap();
        assert_eq!(uploaded.id, "file-abc");
        assert_eq!(uploaded.bytes, 120);
        assert_eq!(uploaded.filename, "input.jsonl");
    }

    #[test]
    fn parse_in_progress_batch_without_output_file() {
        let json = r#"{"id":"batch_123","object":"batch","status":"in_progress","output_file_id":null,"error_file_id":null}"#;
        let job: BatchJob = serde_json::from_str(json).unwrap();
        assert_eq!(job.id, "batch_123");
        assert_eq!(job.status, "in_progress");
        assert!(job.output_file_id.is_none());
    }

    #[test]
    fn parse_completed_batch_with_output_file() {
        let json = r#"{"id":"batch_123","status":"completed","output_file_id":"file-out","error_file_id":"file-err"}"#;
        let job: BatchJob = serde_json::from_str(json).unwrap();
        assert_eq!(job.status, "completed");
        assert_eq!(job.output_file_id.as_deref(), Some("file-out"));
        assert_eq!(job.error_file_id.as_deref(), Some("file-err"));
    }

    #[test]
    fn parse_batch_missing_optional_fields() {
        // Some gateways omit null fields entirely.
        let json = r#"{"id":"batch_9","status":"validating"}"#;
        let job: BatchJob = serde_json::from_str(json).unwrap();
        assert!(job.output_file_id.is_none());
        assert!(job.error_file_id.is_none());
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = OpenAIApi::with_base_url("key", "http://localhost:8080/v1/");
        assert_eq!(api.base_url, "http://localhost:8080/v1");
    }
}
