//! Flattening of raw batch output into reduced per-record JSONL.
//!
//! Each raw line is an OpenAI batch result object; the reduced shape
//! keeps only the request's `custom_id` (duplicated as `id`) and the
//! generated text pulled out of the nested chat-completion body.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// JSON pointer to the generated text inside a raw result object.
const GENERATION_POINTER: &str = "/response/body/choices/0/message/content";

/// Reduced output record, one per raw output line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedRecord {
    pub id: String,
    pub custom_id: String,
    pub generation: String,
}

/// Extract a [`ProcessedRecord`] from one raw output line.
///
/// `line_no` is 1-based and only used for error reporting. A line that
/// is not valid JSON, lacks `custom_id`, or lacks the nested generation
/// field is a [`CoreError::MalformedOutputRecord`].
pub fn flatten_record(line: &str, line_no: usize) -> Result<ProcessedRecord, CoreError> {
    let value: serde_json::Value =
        serde_json::from_str(line).map_err(|e| CoreError::MalformedOutputRecord {
            line_no,
            reason: e.to_string(),
        })?;

    let custom_id = value
        .get("custom_id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| missing_field(line_no, "custom_id"))?
        .to_string();

    let generation = value
        .pointer(GENERATION_POINTER)
        .and_then(|v| v.as_str())
        .ok_or_else(|| missing_field(line_no, "response.body.choices[0].message.content"))?
        .to_string();

    Ok(ProcessedRecord {
        id: custom_id.clone(),
        custom_id,
        generation,
    })
}

fn missing_field(line_no: usize, field: &str) -> CoreError {
    CoreError::MalformedOutputRecord {
        line_no,
        reason: format!("missing field {field}"),
    }
}

/// Flatten an entire raw output file into `processed_path`.
///
/// All lines are parsed before anything is written, so a malformed line
/// fails the whole operation without producing a processed file.
/// Returns the number of records written.
pub fn flatten_file(raw_path: &Path, processed_path: &Path) -> Result<usize, CoreError> {
    let file = File::open(raw_path).map_err(|e| CoreError::io(raw_path, e))?;

    let mut records = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| CoreError::io(raw_path, e))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        records.push(flatten_record(line, idx + 1)?);
    }

    let out = File::create(processed_path).map_err(|e| CoreError::io(processed_path, e))?;
    let mut writer = BufWriter::new(out);
    for record in &records {
        serde_json::to_writer(&mut writer, record)?;
        writer
            .write_all(b"\n")
            .map_err(|e| CoreError::io(processed_path, e))?;
    }
    writer
        .flush()
        .map_err(|e| CoreError::io(processed_path, e))?;

    Ok(records.len())
}
