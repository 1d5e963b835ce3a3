//! Append-only registry mapping sequence ids (`fid`) to OpenAI batch jobs.
//!
//! One JSON object per line, field names matching the historical log
//! format (`fid` stored as a decimal string). The log is only ever
//! appended to; entries are immutable once written. There is no
//! concurrent-writer protection -- a single invoker at a time is assumed.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Timestamp format used in registry entries and derived file names.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One line of the registry log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    /// Monotonically increasing sequence id, serialized as a decimal string.
    #[serde(with = "fid_string")]
    pub fid: u64,
    /// Caller-supplied data label.
    pub data: String,
    /// Caller-supplied version tag.
    pub version: String,
    /// Submission timestamp, formatted with [`DATE_FORMAT`].
    pub date: String,
    /// Batch job id returned by the remote service.
    pub batch_job_id: String,
}

/// Format the current local time for a new registry entry.
pub fn submission_date() -> String {
    chrono::Local::now().format(DATE_FORMAT).to_string()
}

/// Handle to the registry log file.
pub struct Registry {
    path: PathBuf,
}

impl Registry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Compute the next sequence id: `max(existing fids) + 1`.
    ///
    /// A missing log file is treated as empty, so the first id is 1.
    /// Lines that parse as JSON but carry no usable `fid` are skipped;
    /// lines that are not valid JSON fail the scan.
    pub fn next_fid(&self) -> Result<u64, CoreError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(1),
            Err(e) => return Err(CoreError::io(&self.path, e)),
        };

        let mut max_fid = 0u64;
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| CoreError::io(&self.path, e))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let value: serde_json::Value =
                serde_json::from_str(line).map_err(|e| CoreError::MalformedRegistryLine {
                    line_no: idx + 1,
                    source: e,
                })?;
            if let Some(fid) = parse_fid(&value) {
                max_fid = max_fid.max(fid);
            }
        }
        Ok(max_fid + 1)
    }

    /// Append one entry, creating the log (and its parent directory) on
    /// first use.
    pub fn append(&self, entry: &RegistryEntry) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| CoreError::io(parent, e))?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| CoreError::io(&self.path, e))?;

        let mut line = serde_json::to_string(entry)?;
        line.push('\n');
        file.write_all(line.as_bytes())
            .map_err(|e| CoreError::io(&self.path, e))
    }

    /// Find the entry with the given fid. The first matching line wins;
    /// a missing log or no match is a [`CoreError::NotFound`].
    pub fn find(&self, fid: u64) -> Result<RegistryEntry, CoreError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CoreError::NotFound { fid });
            }
            Err(e) => return Err(CoreError::io(&self.path, e)),
        };

        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| CoreError::io(&self.path, e))?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let value: serde_json::Value =
                serde_json::from_str(line).map_err(|e| CoreError::MalformedRegistryLine {
                    line_no: idx + 1,
                    source: e,
                })?;
            if parse_fid(&value) == Some(fid) {
                let entry = serde_json::from_value(value).map_err(|e| {
                    CoreError::MalformedRegistryLine {
                        line_no: idx + 1,
                        source: e,
                    }
                })?;
                return Ok(entry);
            }
        }
        Err(CoreError::NotFound { fid })
    }
}

/// Extract a usable fid from a parsed registry line. Historical entries
/// store it as a decimal string, but a bare integer is accepted too.
fn parse_fid(value: &serde_json::Value) -> Option<u64> {
    match value.get("fid")? {
        serde_json::Value::String(s) => s.trim().parse().ok(),
        other => other.as_u64(),
    }
}

mod fid_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(fid: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&fid.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(s) => s.trim().parse().map_err(de::Error::custom),
            serde_json::Value::Number(n) => n
                .as_u64()
                .ok_or_else(|| de::Error::custom("fid must be a non-negative integer")),
            _ => Err(de::Error::custom("fid must be a string or integer")),
        }
    }
}
