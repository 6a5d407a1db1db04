//! CSV ingestion and cleaning for uploaded temperature files.

use std::io::Read;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use flate2::read::GzDecoder;
use thiserror::Error;
use tracing::debug;

use crate::reading::{
    COL_LOCATION, COL_MODULE, COL_TEMPERATURE, COL_TIMESTAMP, Dataset, Reading,
};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%Y.%m.%d %H:%M:%S%.f",
    "%Y.%m.%d %H:%M",
];

/// Layouts carrying a UTC offset; converted to local wall-clock time.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M:%S%.f%#z",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

/// Cell values treated as a missing temperature. Numbers that parse to NaN or
/// infinity are treated the same way.
const NA_MARKERS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "NULL", "None", "-"];

/// Reasons an uploaded file is rejected as a whole.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to decompress input: {0}")]
    Io(#[from] std::io::Error),

    #[error("required column `{0}` not found in header")]
    MissingColumn(&'static str),

    #[error("row {row}: cannot parse `{value}` as a date-time")]
    InvalidTimestamp { row: usize, value: String },

    #[error("row {row}: cannot parse `{value}` as a temperature")]
    InvalidTemperature { row: usize, value: String },
}

struct Columns {
    timestamp: usize,
    location: usize,
    module: usize,
    temperature: usize,
}

impl Columns {
    fn locate(headers: &StringRecord) -> Result<Self, IngestError> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(IngestError::MissingColumn(name))
        };

        Ok(Self {
            timestamp: find(COL_TIMESTAMP)?,
            location: find(COL_LOCATION)?,
            module: find(COL_MODULE)?,
            temperature: find(COL_TEMPERATURE)?,
        })
    }
}

/// Parses an uploaded file into a [`Dataset`].
///
/// Rows with a missing or non-positive temperature are dropped; source order
/// is otherwise preserved. A timestamp that cannot be parsed rejects the whole
/// file.
///
/// # Errors
///
/// Returns an [`IngestError`] if the bytes are not a well-formed CSV with the
/// expected headers, or if any timestamp or temperature value is unparseable.
pub fn load(bytes: &[u8]) -> Result<Dataset, IngestError> {
    let decoded;
    let mut bytes = bytes;
    if bytes.starts_with(GZIP_MAGIC) {
        let mut buf = Vec::new();
        GzDecoder::new(bytes).read_to_end(&mut buf)?;
        decoded = buf;
        bytes = &decoded;
    }
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(bytes);
    let columns = Columns::locate(rdr.headers()?)?;

    let mut readings = Vec::new();
    let mut missing = 0usize;
    let mut non_positive = 0usize;

    for (idx, record) in rdr.records().enumerate() {
        let record = record?;
        let row = idx + 1;
        let cell = |i: usize| record.get(i).unwrap_or("");

        let timestamp = parse_timestamp(cell(columns.timestamp)).ok_or_else(|| {
            IngestError::InvalidTimestamp {
                row,
                value: cell(columns.timestamp).to_string(),
            }
        })?;

        let Some(temperature) = parse_temperature(cell(columns.temperature), row)? else {
            missing += 1;
            continue;
        };
        if temperature <= 0.0 {
            non_positive += 1;
            continue;
        }

        readings.push(Reading {
            timestamp,
            location_name: cell(columns.location).to_string(),
            module_id: cell(columns.module).to_string(),
            temperature,
        });
    }

    debug!(
        kept = readings.len(),
        missing, non_positive, "Loaded temperature readings"
    );

    Ok(Dataset::new(readings))
}

/// Parses a timestamp cell, accepting date-only values as midnight.
///
/// Values with a UTC offset (or `Z`) are converted to local time.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .or_else(|| parse_with_offset(value).map(|dt| dt.with_timezone(&Local).naive_local()))
}

fn parse_with_offset(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).ok().or_else(|| {
        OFFSET_FORMATS
            .iter()
            .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
    })
}

fn parse_temperature(value: &str, row: usize) -> Result<Option<f64>, IngestError> {
    let value = value.trim();
    if value.is_empty() || NA_MARKERS.contains(&value) {
        return Ok(None);
    }

    match value.parse::<f64>() {
        Ok(t) if !t.is_finite() => Ok(None),
        Ok(t) => Ok(Some(t)),
        Err(_) => Err(IngestError::InvalidTemperature {
            row,
            value: value.to_string(),
        }),
    }
}
