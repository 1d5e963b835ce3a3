//! Integration tests for raw-output flattening against real files.

use batchgen_core::flatten::flatten_file;
use batchgen_core::CoreError;

const RAW_LINE: &str =
    r#"{"custom_id":"a","response":{"body":{"choices":[{"message":{"content":"hi"}}]}}}"#;

/// One reduced record is produced per raw input line, preserving
/// `custom_id` and extracting the nested generation text.
#[test]
fn flatten_file_produces_one_record_per_line() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw.jsonl");
    let processed = dir.path().join("processed.jsonl");

    let second =
        r#"{"custom_id":"b","response":{"body":{"choices":[{"message":{"content":"bye"}}]}}}"#;
    std::fs::write(&raw, format!("{RAW_LINE}\n{second}\n")).unwrap();

    let count = flatten_file(&raw, &processed).unwrap();
    assert_eq!(count, 2);

    let contents = std::fs::read_to_string(&processed).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 2);

    let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(first["id"], "a");
    assert_eq!(first["custom_id"], "a");
    assert_eq!(first["generation"], "hi");

    let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(second["custom_id"], "b");
    assert_eq!(second["generation"], "bye");
}

/// Blank lines in the raw file are ignored rather than treated as records.
#[test]
fn flatten_file_skips_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw.jsonl");
    let processed = dir.path().join("processed.jsonl");
    std::fs::write(&raw, format!("{RAW_LINE}\n\n")).unwrap();

    assert_eq!(flatten_file(&raw, &processed).unwrap(), 1);
}

/// A malformed line fails the whole operation and no processed file is
/// written.
#[test]
fn flatten_file_fails_whole_operation_on_malformed_line() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw.jsonl");
    let processed = dir.path().join("processed.jsonl");
    std::fs::write(&raw, format!("{RAW_LINE}\n{{\"custom_id\":\"b\"}}\n")).unwrap();

    let err = flatten_file(&raw, &processed).unwrap_err();
    match err {
        CoreError::MalformedOutputRecord { line_no, .. } => assert_eq!(line_no, 2),
        other => panic!("Expected MalformedOutputRecord, got {other:?}"),
    }
    assert!(!processed.exists());
}

/// A missing raw file surfaces as an I/O error naming the path.
#[test]
fn flatten_file_reports_missing_raw_file() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("missing.jsonl");
    let processed = dir.path().join("processed.jsonl");

    let err = flatten_file(&raw, &processed).unwrap_err();
    match err {
        CoreError::Io { path, .. } => assert_eq!(path, raw),
        other => panic!("Expected Io, got {other:?}"),
    }
}
