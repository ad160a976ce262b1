//! JSON persistence for extracted records.
//!
//! Records are written as indented UTF-8 JSON with non-ASCII text left
//! unescaped, one file per product.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use prodx_core::ExtractedRecord;

use crate::error::PersistError;

/// Pretty-printed JSON for `record`.
///
/// # Errors
///
/// Returns [`PersistError::Json`] if serialization fails.
pub fn to_json_pretty(record: &ExtractedRecord) -> Result<String, PersistError> {
    Ok(serde_json::to_string_pretty(record)?)
}

/// `product_<id>_<YYYYmmdd_HHMMSS>.json`, using the record's own extraction
/// time. Records without a product id use `unknown`.
#[must_use]
pub fn default_file_name(record: &ExtractedRecord) -> String {
    let id = record
        .product_id()
        .map(sanitize)
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| "unknown".to_string());
    let stamp = DateTime::parse_from_rfc3339(&record.scraping_timestamp)
        .map(|ts| ts.with_timezone(&Utc).naive_utc())
        .unwrap_or_else(|_| Utc::now().naive_utc());
    format!("product_{id}_{}.json", file_stamp(stamp))
}

/// Writes `record` into `dir` under [`default_file_name`], creating `dir`
/// if needed. Returns the written path.
///
/// # Errors
///
/// Returns [`PersistError::Io`] if the directory or file cannot be written.
pub fn write_record(record: &ExtractedRecord, dir: &Path) -> Result<PathBuf, PersistError> {
    std::fs::create_dir_all(dir).map_err(|source| PersistError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(default_file_name(record));
    write_record_to(record, &path)?;
    Ok(path)
}

/// Writes `record` to exactly `path`.
///
/// # Errors
///
/// Returns [`PersistError`] on serialization or I/O failure.
pub fn write_record_to(record: &ExtractedRecord, path: &Path) -> Result<(), PersistError> {
    let mut json = to_json_pretty(record)?;
    json.push('\n');
    std::fs::write(path, json).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), "record written");
    Ok(())
}

/// Reads a record previously written by [`write_record`].
///
/// # Errors
///
/// Returns [`PersistError`] if the file is unreadable or not a record.
pub fn read_record(path: &Path) -> Result<ExtractedRecord, PersistError> {
    let text = std::fs::read_to_string(path).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

fn file_stamp(ts: NaiveDateTime) -> String {
    ts.format("%Y%m%d_%H%M%S").to_string()
}

/// Keeps ids safe to embed in a file name.
fn sanitize(id: &str) -> String {
    id.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect()
}
