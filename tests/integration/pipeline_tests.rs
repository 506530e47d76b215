/*!
 * Full pipeline scenario tests, driven through the controller with a
 * scripted gateway.
 */

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use gameloc::app_config::Config;
use gameloc::app_controller::Controller;
use gameloc::pipeline::RunSummary;
use gameloc::providers::mock::{MockGateway, MockReply};

use crate::common;

fn config(rules_dir: &Path, languages: &[&str]) -> Config {
    let mut config = Config::default();
    config.rules_dir = rules_dir.to_string_lossy().to_string();
    config.languages = languages.iter().map(|l| l.to_string()).collect();
    // Sequential processing keeps scripted replies aligned with pairs
    config.pipeline.concurrency = 1;
    config
}

async fn run(
    config: Config,
    gateway: MockGateway,
    input: &Path,
    output: &Path,
) -> Result<RunSummary> {
    let controller = Controller::with_config(config)?;
    controller
        .run_with_gateway(Arc::new(gateway), input, output)
        .await
}

fn output_rows(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .skip(1)
        .map(|l| l.to_string())
        .collect()
}

#[tokio::test]
async fn test_run_withCleanTranslations_shouldAcceptEveryPair() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let rules_dir = common::create_rules_dir(dir.path())?;
    let input = common::create_input_csv(dir.path(), "strings.csv")?;
    let output = dir.path().join("out.csv");

    let gateway = MockGateway::scripted(vec![
        MockReply::Text("Schließe dich der Jagd an".into()), // R1 deDE
        MockReply::Text("Rejoignez la Chasse".into()),       // R1 frFR
        MockReply::Text("{Count} Abschüsse".into()),         // R2 deDE
        MockReply::Text("{Count} victimes".into()),          // R2 frFR
    ]);

    let summary = run(
        config(&rules_dir, &["frFR", "deDE"]),
        gateway.clone(),
        &input,
        &output,
    )
    .await?;

    assert_eq!(summary.accepted, 4);
    assert_eq!(summary.escalated, 0);
    assert_eq!(gateway.call_count(), 4);

    // Record-major, language-sorted emission order
    let rows = output_rows(&output);
    assert!(rows[0].starts_with("R1,deDE"));
    assert!(rows[1].starts_with("R1,frFR"));
    assert!(rows[2].starts_with("R2,deDE"));
    assert!(rows[3].starts_with("R2,frFR"));
    Ok(())
}

#[tokio::test]
async fn test_run_withPlaceholderViolation_shouldRetryWithFeedbackAndAccept() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let rules_dir = common::create_rules_dir(dir.path())?;
    let input = common::create_input_csv(dir.path(), "strings.csv")?;
    let output = dir.path().join("out.csv");

    let gateway = MockGateway::scripted(vec![
        MockReply::Text("Rejoignez la Chasse".into()),  // R1 clean
        MockReply::Text("{Compte} victimes".into()),    // R2 attempt 1, bad token
        MockReply::Text("{Count} victimes".into()),     // R2 attempt 2, fixed
    ]);

    let summary = run(config(&rules_dir, &["frFR"]), gateway.clone(), &input, &output).await?;

    assert_eq!(summary.accepted, 2);
    assert_eq!(gateway.call_count(), 3);

    // The retry prompt carries the rejected text and the finding
    let retry_request = &gateway.requests()[2];
    assert!(retry_request.user.contains("{Compte} victimes"));
    assert!(retry_request.user.contains("CRITICAL"));

    let rows = output_rows(&output);
    assert!(rows[1].starts_with("R2,frFR,{Count} victimes,accepted,2"));
    Ok(())
}

#[tokio::test]
async fn test_run_withSingleAttemptBudget_shouldEscalateWithoutRetry() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let rules_dir = common::create_rules_dir(dir.path())?;
    let input = common::create_test_file(
        dir.path(),
        "strings.csv",
        "Record ID,src_enUS\nR2,{Count} kills\n",
    )?;
    let output = dir.path().join("out.csv");

    let gateway =
        MockGateway::scripted(Vec::new()).with_fallback(MockReply::Text("{Compte} victimes".into()));

    let mut config = config(&rules_dir, &["frFR"]);
    config.pipeline.max_attempts = 1;

    let summary = run(config, gateway.clone(), &input, &output).await?;

    assert_eq!(summary.escalated, 1);
    assert_eq!(gateway.call_count(), 1);

    // The rejected text is kept in the output for human review
    let rows = output_rows(&output);
    assert!(rows[0].contains("escalated"));
    assert!(rows[0].contains("{Compte} victimes"));
    Ok(())
}

#[tokio::test]
async fn test_run_withUnavailableModel_shouldEscalateWithError() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let rules_dir = common::create_rules_dir(dir.path())?;
    let input = common::create_test_file(
        dir.path(),
        "strings.csv",
        "Record ID,src_enUS\nR1,Join the Hunt\n",
    )?;
    let output = dir.path().join("out.csv");

    let gateway = MockGateway::failing();

    let summary = run(config(&rules_dir, &["frFR"]), gateway.clone(), &input, &output).await?;

    assert_eq!(summary.escalated, 1);
    // Every budgeted attempt was consumed by the failing gateway
    assert_eq!(gateway.call_count(), 3);

    let rows = output_rows(&output);
    assert!(rows[0].contains("escalated"));
    assert!(rows[0].contains("Model unavailable"));
    Ok(())
}

#[tokio::test]
async fn test_run_withMissingRuleset_shouldSkipLanguage() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let rules_dir = common::create_rules_dir(dir.path())?;
    let input = common::create_test_file(
        dir.path(),
        "strings.csv",
        "Record ID,src_enUS\nR1,Join the Hunt\n",
    )?;
    let output = dir.path().join("out.csv");

    let gateway = MockGateway::scripted(vec![MockReply::Text("Rejoignez la Chasse".into())]);

    let summary = run(
        config(&rules_dir, &["frFR", "esES"]),
        gateway.clone(),
        &input,
        &output,
    )
    .await?;

    assert_eq!(summary.accepted, 1);
    assert_eq!(summary.skipped, 1);
    // Only the supported language reached the gateway
    assert_eq!(gateway.call_count(), 1);

    let rows = output_rows(&output);
    assert!(rows.iter().any(|r| r.starts_with("R1,esES,,skipped,0")));
    Ok(())
}

#[tokio::test]
async fn test_run_withAutoRetryDisabled_shouldEscalateOnFirstFail() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let rules_dir = common::create_rules_dir(dir.path())?;
    let input = common::create_test_file(
        dir.path(),
        "strings.csv",
        "Record ID,src_enUS\nR2,{Count} kills\n",
    )?;
    let output = dir.path().join("out.csv");

    let gateway =
        MockGateway::scripted(Vec::new()).with_fallback(MockReply::Text("{Compte} victimes".into()));

    let mut config = config(&rules_dir, &["frFR"]);
    config.pipeline.auto_retry = false;

    let summary = run(config, gateway.clone(), &input, &output).await?;

    assert_eq!(summary.escalated, 1);
    assert_eq!(gateway.call_count(), 1);
    Ok(())
}

#[test]
fn test_run_withEchoedSource_shouldRetryBeforeAccepting() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let rules_dir = common::create_rules_dir(dir.path())?;
    let input = common::create_test_file(
        dir.path(),
        "strings.csv",
        "Record ID,src_enUS\nR1,Join the Hunt\n",
    )?;
    let output = dir.path().join("out.csv");

    let gateway = MockGateway::scripted(vec![
        MockReply::Text("Join the Hunt".into()),       // echoes the source, rejected
        MockReply::Text("Rejoignez la Chasse".into()), // retry is accepted
    ]);

    let summary = tokio_test::block_on(async {
        run(config(&rules_dir, &["frFR"]), gateway.clone(), &input, &output).await
    })?;

    assert_eq!(summary.accepted, 1);
    assert_eq!(gateway.call_count(), 2);

    let rows = output_rows(&output);
    assert!(rows[0].starts_with("R1,frFR,Rejoignez la Chasse,accepted,2"));
    Ok(())
}

#[tokio::test]
async fn test_run_glossaryMiss_shouldAcceptButRecordFinding() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let rules_dir = common::create_rules_dir(dir.path())?;
    let input = common::create_test_file(
        dir.path(),
        "strings.csv",
        "Record ID,src_enUS\nR1,Join the Hunt\n",
    )?;
    let output = dir.path().join("out.csv");

    // "Chasse" is mandated for "Hunt" but the reply uses another word
    let gateway = MockGateway::scripted(vec![MockReply::Text("Rejoignez la bataille".into())]);

    let summary = run(config(&rules_dir, &["frFR"]), gateway.clone(), &input, &output).await?;

    // High findings are reported but do not block acceptance
    assert_eq!(summary.accepted, 1);
    assert_eq!(gateway.call_count(), 1);

    let rows = output_rows(&output);
    assert!(rows[0].contains("accepted"));
    assert!(rows[0].contains("qa/glossary"));
    Ok(())
}
