//! Bulk document-collection write and the insert-error log.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use osmw_model::OutputRecord;

use crate::sink::InsertFailure;

/// The document collection lands next to the input as `<input-path>.json`.
pub fn documents_path(input_path: &Path) -> PathBuf {
    let mut name = input_path.as_os_str().to_owned();
    name.push(".json");
    PathBuf::from(name)
}

/// Insert failures land next to the collection as
/// `<json-path>-error-to-insert-json.log`.
pub fn insert_errors_path(json_path: &Path) -> PathBuf {
    let mut name = json_path.as_os_str().to_owned();
    name.push("-error-to-insert-json.log");
    PathBuf::from(name)
}

/// Write the whole record batch as one JSON array.
pub fn write_documents(input_path: &Path, records: &[OutputRecord]) -> Result<PathBuf> {
    let json_path = documents_path(input_path);
    let body = serde_json::to_string(records).context("serialize document collection")?;
    fs::write(&json_path, body)
        .with_context(|| format!("write documents: {}", json_path.display()))?;
    info!(path = %json_path.display(), records = records.len(), "documents written");
    Ok(json_path)
}

/// Write the literal document text of every failed insert, one per line.
pub fn write_insert_errors(json_path: &Path, failures: &[InsertFailure]) -> Result<PathBuf> {
    let log_path = insert_errors_path(json_path);
    let mut body = String::new();
    for failure in failures {
        body.push_str(&failure.document);
        body.push('\n');
    }
    fs::write(&log_path, body)
        .with_context(|| format!("write insert-error log: {}", log_path.display()))?;
    info!(path = %log_path.display(), failures = failures.len(), "insert-error log written");
    Ok(log_path)
}
