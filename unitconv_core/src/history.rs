//! Session-scoped conversion history with CSV export.
//!
//! A `HistoryLog` lives as long as the session that owns it. Nothing is
//! persisted unless the session explicitly exports it.

use crate::{Error, HistoryEntry, Result};
use chrono::{Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tempfile::NamedTempFile;

/// Timestamp format used in exported files
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default export file name
pub const DEFAULT_EXPORT_FILE: &str = "conversion_history.csv";

/// A row in the CSV export
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Category")]
    category: String,
    #[serde(rename = "Value")]
    value: f64,
    #[serde(rename = "From")]
    from: String,
    #[serde(rename = "To")]
    to: String,
    #[serde(rename = "Converted")]
    converted: String,
}

impl CsvRow {
    fn from_entry(entry: &HistoryEntry, precision: usize) -> Self {
        CsvRow {
            date: entry.timestamp.format(DATE_FORMAT).to_string(),
            category: entry.category.clone(),
            value: entry.value,
            from: entry.from_unit.clone(),
            to: entry.to_unit.clone(),
            converted: format!("{:.*}", precision, entry.converted),
        }
    }
}

impl TryFrom<CsvRow> for HistoryEntry {
    type Error = Error;

    fn try_from(row: CsvRow) -> Result<Self> {
        let naive = NaiveDateTime::parse_from_str(&row.date, DATE_FORMAT)
            .map_err(|e| Error::Parse(format!("Invalid date '{}': {}", row.date, e)))?;
        let timestamp = Local
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| Error::Parse(format!("Nonexistent local time '{}'", row.date)))?;
        let converted = row
            .converted
            .parse::<f64>()
            .map_err(|e| Error::Parse(format!("Invalid converted value '{}': {}", row.converted, e)))?;

        Ok(HistoryEntry {
            timestamp,
            category: row.category,
            value: row.value,
            from_unit: row.from,
            to_unit: row.to,
            converted,
        })
    }
}

impl HistoryEntry {
    /// Create an entry stamped with the current local time
    pub fn new(
        category: impl Into<String>,
        value: f64,
        from_unit: impl Into<String>,
        to_unit: impl Into<String>,
        converted: f64,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            category: category.into(),
            value,
            from_unit: from_unit.into(),
            to_unit: to_unit.into(),
            converted,
        }
    }
}

/// Ordered, append-only list of conversions made during a session
#[derive(Clone, Debug)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
    precision: usize,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryLog {
    /// Create an empty log that exports converted values with 2 decimals
    pub fn new() -> Self {
        Self::with_precision(2)
    }

    /// Create an empty log with a custom number of decimals for exports
    pub fn with_precision(precision: usize) -> Self {
        Self {
            entries: Vec::new(),
            precision,
        }
    }

    /// Append an entry to the end of the log
    pub fn record(&mut self, entry: HistoryEntry) {
        tracing::debug!(
            "Recorded {} {} -> {} {}",
            entry.value,
            entry.from_unit,
            entry.converted,
            entry.to_unit
        );
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the whole log to `path` as CSV, replacing any existing file
    ///
    /// The rows go to a temp file in the destination directory which is
    /// synced and then renamed over `path`, so readers never see a partial
    /// export. The destination directory must already exist.
    pub fn export_csv(&self, path: &Path) -> Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };

        let temp_file = NamedTempFile::new_in(parent)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(temp_file.as_file());

        // Written explicitly so an empty log still gets a header row
        writer.write_record(["Date", "Category", "Value", "From", "To", "Converted"])?;
        for entry in &self.entries {
            writer.serialize(CsvRow::from_entry(entry, self.precision))?;
        }
        writer.flush()?;
        drop(writer);

        temp_file.as_file().sync_all()?;
        temp_file.persist(path).map_err(|e| e.error)?;

        tracing::info!("Exported {} history entries to {:?}", self.entries.len(), path);
        Ok(())
    }
}

/// Read an exported history file back, in file order
pub fn load_csv(path: &Path) -> Result<Vec<HistoryEntry>> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;

    let mut entries = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        entries.push(HistoryEntry::try_from(result?)?);
    }

    tracing::debug!("Loaded {} history entries from {:?}", entries.len(), path);
    Ok(entries)
}
