//! JSON output of matched records.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::debug;

use crate::error::{Error, Result};
use crate::record::EmailRecord;

/// Where the output is written.
///
/// There is no default destination here; the caller decides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Destination file, created or truncated.
    pub path: PathBuf,
}

impl OutputConfig {
    /// Creates an output configuration for `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Serializes records as a JSON array indented by four spaces.
///
/// Non-ASCII characters are written as UTF-8, not escaped.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json(records: &[EmailRecord]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    records.serialize(&mut serializer)?;
    Ok(buffer)
}

/// Writes records to the configured destination.
///
/// # Errors
///
/// Returns [`Error::OutputWrite`] if the file cannot be created or
/// written.
pub fn write_records(records: &[EmailRecord], config: &OutputConfig) -> Result<()> {
    let json = to_json(records)?;
    let path = config.path.as_path();

    let file = File::create(path).map_err(|source| write_error(path, source))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(&json)
        .and_then(|()| writer.flush())
        .map_err(|source| write_error(path, source))?;

    debug!("Wrote {} records ({} bytes) to {}", records.len(), json.len(), path.display());
    Ok(())
}

fn write_error(path: &Path, source: std::io::Error) -> Error {
    Error::OutputWrite {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Vec<EmailRecord> {
        vec![
            EmailRecord {
                subject: "Café ☕".to_string(),
                body: "Grüße".to_string(),
                from: "Zoë".to_string(),
                to: "team".to_string(),
                delivery_time: Some("2023-03-15T10:30:00".to_string()),
            },
            EmailRecord::default(),
        ]
    }

    #[test]
    fn test_to_json_layout() {
        let json = String::from_utf8(to_json(&sample()).unwrap()).unwrap();
        let expected = r#"[
    {
        "subject": "Café ☕",
        "body": "Grüße",
        "from": "Zoë",
        "to": "team",
        "delivery_time": "2023-03-15T10:30:00"
    },
    {
        "subject": "",
        "body": "",
        "from": "",
        "to": "",
        "delivery_time": null
    }
]"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn test_to_json_empty() {
        assert_eq!(to_json(&[]).unwrap(), b"[]");
    }

    #[test]
    fn test_write_records() {
        let dir = tempfile::tempdir().unwrap();
        let config = OutputConfig::new(dir.path().join("out.json"));

        write_records(&sample(), &config).unwrap();

        let written = std::fs::read(&config.path).unwrap();
        assert_eq!(written, to_json(&sample()).unwrap());
        let parsed: serde_json::Value = serde_json::from_slice(&written).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_write_records_unwritable_destination() {
        let dir = tempfile::tempdir().unwrap();
        let config = OutputConfig::new(dir.path().join("missing-dir").join("out.json"));

        let err = write_records(&sample(), &config).unwrap_err();
        assert!(matches!(err, Error::OutputWrite { ref path, .. } if *path == config.path));
    }
}
