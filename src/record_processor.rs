/*!
 * Input record handling.
 *
 * Loads game text rows from the input CSV and validates them before they
 * enter the pipeline. The expected columns follow the export format of the
 * localization database: "Record ID", "src_enUS", optional "Context" and
 * "Path". Rows failing validation are dropped with a logged error; a file
 * yielding no valid rows is an error for the run.
 */

use anyhow::{Result, anyhow};
use log::{info, warn};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// One translatable row from the input CSV
///
/// Immutable once loaded. Identity is the record id, unique within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Unique record identifier
    pub id: String,
    /// English source text
    pub source_text: String,
    /// Free-form context for the translator, when present
    pub context: Option<String>,
    /// Asset path the string belongs to, when present
    pub path: Option<String>,
}

impl Record {
    /// Create a record with only the mandatory fields
    pub fn new(id: impl Into<String>, source_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source_text: source_text.into(),
            context: None,
            path: None,
        }
    }

    /// Set the context field
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Set the path field
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// Raw CSV row as exported by the localization database
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Record ID")]
    record_id: String,
    #[serde(rename = "src_enUS")]
    source_text: String,
    #[serde(rename = "Context", default)]
    context: Option<String>,
    #[serde(rename = "Path", default)]
    path: Option<String>,
}

/// Loads and validates input records
pub struct RecordProcessor;

impl RecordProcessor {
    /// Load records from a CSV file, dropping invalid rows
    pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<Record>> {
        let path = path.as_ref();
        let mut reader = csv::Reader::from_path(path)
            .map_err(|e| anyhow!("Failed to open input CSV {}: {}", path.display(), e))?;

        let mut records = Vec::new();
        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut dropped = 0usize;

        for (line, row) in reader.deserialize::<RawRow>().enumerate() {
            let row = match row {
                Ok(row) => row,
                Err(e) => {
                    warn!("Dropping unreadable row {} in {}: {}", line + 2, path.display(), e);
                    dropped += 1;
                    continue;
                }
            };

            let id = row.record_id.trim().to_string();
            let source_text = row.source_text.trim().to_string();

            if id.is_empty() || source_text.is_empty() {
                warn!(
                    "Dropping row {} in {}: missing record id or source text",
                    line + 2,
                    path.display()
                );
                dropped += 1;
                continue;
            }
            if !seen_ids.insert(id.clone()) {
                warn!("Dropping row {} in {}: duplicate record id {}", line + 2, path.display(), id);
                dropped += 1;
                continue;
            }

            records.push(Record {
                id,
                source_text,
                context: row.context.filter(|c| !c.trim().is_empty()),
                path: row.path.filter(|p| !p.trim().is_empty()),
            });
        }

        if records.is_empty() {
            return Err(anyhow!("No valid records in input CSV {}", path.display()));
        }

        info!(
            "Loaded {} records from {} ({} dropped)",
            records.len(),
            path.display(),
            dropped
        );
        Ok(records)
    }
}
