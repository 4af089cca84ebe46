//! Output formatting and persistence for scored listings.
//!
//! Supports JSON logging, whole-file CSV writes, and single-row CSV append.

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::scoring::ListingMetrics;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs any serializable value as pretty-printed JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Writes `rows` to a fresh CSV file at `path`, replacing any existing file.
pub fn write_records(path: &str, rows: &[ListingMetrics]) -> Result<()> {
    debug!(path, rows = rows.len(), "Writing CSV records");

    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Appends a [`ListingMetrics`] record as a row to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, row: &ListingMetrics) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV record");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    writer.serialize(row)?;
    writer.flush()?;

    Ok(())
}
