//! Reading the uploaded file from disk, stdin, or a URL.

use anyhow::{Context, Result};
use std::io::Read;

/// Fetches `url` with a blocking HTTP GET and returns the body.
pub fn fetch_bytes(url: &str) -> Result<Vec<u8>> {
    let resp = reqwest::blocking::get(url)?.error_for_status()?;
    Ok(resp.bytes()?.to_vec())
}

/// Loads raw bytes from a file path, an `http(s)://` URL, or `-` for stdin.
#[tracing::instrument(fields(source = %source))]
pub fn read_source(source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_bytes(source).with_context(|| format!("fetching {source}"))?
    } else if source == "-" {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        buf
    } else {
        std::fs::read(source).with_context(|| format!("reading {source}"))?
    };
    tracing::debug!(bytes = bytes.len(), "Source loaded");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn test_read_source_from_file() {
        let path = env::temp_dir().join("office_temp_monitor_test_source.csv");
        fs::write(&path, b"abc").unwrap();

        let bytes = read_source(path.to_str().unwrap()).unwrap();
        assert_eq!(bytes, b"abc");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_read_source_missing_file() {
        let err = read_source("/nonexistent/office_temp_monitor.csv").unwrap_err();
        assert!(err.to_string().contains("reading"));
    }
}
