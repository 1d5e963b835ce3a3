use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Registry entry not found: fid {fid}")]
    NotFound { fid: u64 },

    #[error("Malformed registry line {line_no}: {source}")]
    MalformedRegistryLine {
        line_no: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Malformed output record at line {line_no}: {reason}")]
    MalformedOutputRecord { line_no: usize, reason: String },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
