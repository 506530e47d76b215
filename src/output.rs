/*!
 * Output emission.
 *
 * Outcomes are written incrementally so a crashed or interrupted run loses
 * at most the pair in flight. The CSV sink doubles as the resume source:
 * on startup the orchestrator asks it which pairs already have a terminal
 * row and skips them. Skipped and malformed rows are compacted away when
 * the file is reopened, so those pairs get exactly one fresh row when they
 * are processed again.
 */

use anyhow::{Context, Result};
use log::{info, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::pipeline::{OutcomeStatus, TranslationOutcome};

/// Destination for terminal pair outcomes
pub trait OutputSink: Send + Sync {
    /// Append one outcome; appending an already-emitted pair is a no-op
    fn append(&self, outcome: &TranslationOutcome) -> Result<()>;

    /// Pairs that already have a terminal row, as (record id, language)
    fn completed_pairs(&self) -> Result<HashSet<(String, String)>>;
}

/// One output row in the translations CSV
#[derive(Debug, Serialize, Deserialize)]
struct OutputRow {
    #[serde(rename = "Record ID")]
    record_id: String,
    #[serde(rename = "Language")]
    language_code: String,
    #[serde(rename = "Translation")]
    translation: String,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "Attempts")]
    attempts: u32,
    #[serde(rename = "Notes")]
    notes: String,
}

/// Pairs written so far, split by whether the row is terminal
#[derive(Debug, Default)]
struct SinkState {
    completed: HashSet<(String, String)>,
    skipped: HashSet<(String, String)>,
}

/// CSV-backed output sink, append-only
pub struct CsvSink {
    path: PathBuf,
    state: Mutex<SinkState>,
}

impl CsvSink {
    /// Open a sink at the given path, reading prior rows for resume
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let completed = Self::load_and_compact(&path)?;
        if !completed.is_empty() {
            info!(
                "Resuming: {} pairs already complete in {}",
                completed.len(),
                path.display()
            );
        }
        Ok(Self {
            path,
            state: Mutex::new(SinkState {
                completed,
                skipped: HashSet::new(),
            }),
        })
    }

    /// Terminal pairs recorded in an existing output file
    ///
    /// Skipped rows do not count; those pairs are attempted again on the
    /// next run, when the missing ruleset may have been added. Both skipped
    /// rows and rows a crash left malformed are dropped from the file here,
    /// so a re-processed pair never ends up with two rows.
    fn load_and_compact(path: &Path) -> Result<HashSet<(String, String)>> {
        if !path.exists() {
            return Ok(HashSet::new());
        }
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("Failed to read output CSV {}", path.display()))?;

        let mut kept: Vec<OutputRow> = Vec::new();
        let mut dropped = 0usize;
        for row in reader.deserialize::<OutputRow>() {
            match row {
                Ok(row) if row.status == OutcomeStatus::Skipped.to_string() => dropped += 1,
                Ok(row) => kept.push(row),
                Err(e) => {
                    warn!("Dropping malformed row in {}: {}", path.display(), e);
                    dropped += 1;
                }
            }
        }

        if dropped > 0 {
            let staging = path.with_extension("csv.tmp");
            {
                let mut writer = csv::Writer::from_path(&staging).with_context(|| {
                    format!("Failed to rewrite output CSV {}", path.display())
                })?;
                for row in &kept {
                    writer.serialize(row)?;
                }
                writer.flush()?;
            }
            std::fs::rename(&staging, path)
                .with_context(|| format!("Failed to rewrite output CSV {}", path.display()))?;
            info!(
                "Compacted {}: dropped {} skipped or unreadable rows",
                path.display(),
                dropped
            );
        }

        Ok(kept
            .into_iter()
            .map(|row| (row.record_id, row.language_code))
            .collect())
    }
}

impl OutputSink for CsvSink {
    fn append(&self, outcome: &TranslationOutcome) -> Result<()> {
        let key = (outcome.record_id.clone(), outcome.language_code.clone());
        let mut state = self.state.lock();
        if state.completed.contains(&key) || state.skipped.contains(&key) {
            return Ok(());
        }

        // An empty file can be left behind by compaction; it still needs a header
        let write_header = self
            .path
            .metadata()
            .map(|m| m.len() == 0)
            .unwrap_or(true);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open output CSV {}", self.path.display()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);

        let notes = match (&outcome.final_report, &outcome.error) {
            (Some(report), _) if !report.findings.is_empty() => report.summary(),
            (_, Some(error)) => error.clone(),
            _ => String::new(),
        };

        writer.serialize(OutputRow {
            record_id: outcome.record_id.clone(),
            language_code: outcome.language_code.clone(),
            translation: outcome.final_text.clone().unwrap_or_default(),
            status: outcome.status.to_string(),
            attempts: outcome.attempts_used,
            notes,
        })?;
        writer.flush()?;

        if outcome.status == OutcomeStatus::Skipped {
            state.skipped.insert(key);
        } else {
            state.completed.insert(key);
        }
        Ok(())
    }

    fn completed_pairs(&self) -> Result<HashSet<(String, String)>> {
        Ok(self.state.lock().completed.clone())
    }
}
