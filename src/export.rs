//! CSV export of the filtered readings.
//!
//! Output is UTF-8 with a byte-order mark so spreadsheet tools pick the
//! right encoding for the Korean headers.

use anyhow::Result;
use csv::WriterBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::filter::{FilteredDataset, Selection};
use crate::reading::HEADERS;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Encodes `data` as BOM-prefixed CSV with the ingestion column order.
pub fn export(data: &FilteredDataset<'_>) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_writer(UTF8_BOM.to_vec());

    for reading in data.iter() {
        writer.serialize(reading)?;
    }
    if data.is_empty() {
        writer.write_record(HEADERS)?;
    }

    Ok(writer.into_inner().map_err(|e| e.into_error())?)
}

/// `<location>_온도데이터.csv`, with `전체` standing in for all locations.
pub fn export_file_name(selection: &Selection) -> String {
    format!("{}_온도데이터.csv", selection.label())
}

/// Writes the export into `dir`, creating it if needed, and returns the file path.
pub fn write_export(dir: &Path, selection: &Selection, data: &FilteredDataset<'_>) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(selection));
    debug!(path = %path.display(), rows = data.len(), "Writing CSV export");

    fs::write(&path, export(data)?)?;

    info!(path = %path.display(), rows = data.len(), "Export written");
    Ok(path)
}
