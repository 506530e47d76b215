/*!
 * Output sink tests
 */

use anyhow::Result;
use gameloc::output::{CsvSink, OutputSink};
use gameloc::pipeline::{OutcomeStatus, TranslationOutcome};
use gameloc::qa::{QaFinding, QaReport, Severity, Verdict};

use crate::common;

fn accepted(record_id: &str, language_code: &str, text: &str) -> TranslationOutcome {
    TranslationOutcome {
        record_id: record_id.to_string(),
        language_code: language_code.to_string(),
        status: OutcomeStatus::Accepted,
        final_text: Some(text.to_string()),
        final_report: None,
        attempts: Vec::new(),
        attempts_used: 1,
        error: None,
    }
}

#[test]
fn test_sink_shouldWriteHeaderAndRows() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("out.csv");

    let sink = CsvSink::open(&path)?;
    sink.append(&accepted("R1", "frFR", "Rejoignez la Chasse"))?;

    let content = std::fs::read_to_string(&path)?;
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("Record ID,Language,Translation,Status,Attempts,Notes")
    );
    assert!(lines.next().unwrap().contains("Rejoignez la Chasse"));
    Ok(())
}

#[test]
fn test_sink_escalatedOutcome_shouldCarryFindingsInNotes() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("out.csv");

    let outcome = TranslationOutcome {
        record_id: "R2".to_string(),
        language_code: "frFR".to_string(),
        status: OutcomeStatus::Escalated,
        final_text: Some("{Compte} victimes".to_string()),
        final_report: Some(QaReport {
            record_id: "R2".to_string(),
            language_code: "frFR".to_string(),
            attempt_number: 3,
            findings: vec![QaFinding::new(
                "qa/placeholders",
                Severity::Critical,
                "token altered",
            )],
            verdict: Verdict::Fail,
        }),
        attempts: Vec::new(),
        attempts_used: 3,
        error: None,
    };

    let sink = CsvSink::open(&path)?;
    sink.append(&outcome)?;

    let content = std::fs::read_to_string(&path)?;
    assert!(content.contains("escalated"));
    assert!(content.contains("token altered"));
    Ok(())
}

#[test]
fn test_sink_reopen_shouldNotDuplicateCompletedPairs() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("out.csv");

    {
        let sink = CsvSink::open(&path)?;
        sink.append(&accepted("R1", "frFR", "texte"))?;
    }
    {
        let sink = CsvSink::open(&path)?;
        sink.append(&accepted("R1", "frFR", "texte bis"))?;
        sink.append(&accepted("R1", "deDE", "Text"))?;
    }

    let content = std::fs::read_to_string(&path)?;
    assert_eq!(content.lines().count(), 3); // header + two distinct pairs
    assert!(!content.contains("texte bis"));
    Ok(())
}
