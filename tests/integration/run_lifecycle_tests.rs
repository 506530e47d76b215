/*!
 * Run lifecycle tests: resuming interrupted runs and rerunning finished
 * ones against the same output file.
 */

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use gameloc::app_config::Config;
use gameloc::app_controller::Controller;
use gameloc::providers::mock::{MockGateway, MockReply};

use crate::common;

fn config(rules_dir: &Path) -> Config {
    let mut config = Config::default();
    config.rules_dir = rules_dir.to_string_lossy().to_string();
    config.languages = vec!["frFR".to_string()];
    config.pipeline.concurrency = 1;
    config
}

#[tokio::test]
async fn test_rerun_shouldNotReprocessCompletedPairs() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let rules_dir = common::create_rules_dir(dir.path())?;
    let input = common::create_input_csv(dir.path(), "strings.csv")?;
    let output = dir.path().join("out.csv");

    let first_gateway = MockGateway::scripted(vec![
        MockReply::Text("Rejoignez la Chasse".into()),
        MockReply::Text("{Count} victimes".into()),
    ]);
    let controller = Controller::with_config(config(&rules_dir))?;
    let first = controller
        .run_with_gateway(Arc::new(first_gateway), &input, &output)
        .await?;
    assert_eq!(first.accepted, 2);

    // A second run over the same output must be a no-op for the gateway
    let second_gateway = MockGateway::failing();
    let controller = Controller::with_config(config(&rules_dir))?;
    let second = controller
        .run_with_gateway(Arc::new(second_gateway.clone()), &input, &output)
        .await?;

    assert_eq!(second.already_complete, 2);
    assert_eq!(second.processed(), 0);
    assert_eq!(second_gateway.call_count(), 0);

    let content = std::fs::read_to_string(&output)?;
    assert_eq!(content.lines().count(), 3); // header + the two original rows
    Ok(())
}

#[tokio::test]
async fn test_resume_shouldOnlyProcessMissingPairs() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let rules_dir = common::create_rules_dir(dir.path())?;
    let input = common::create_input_csv(dir.path(), "strings.csv")?;
    let output = dir.path().join("out.csv");

    // Simulate an interrupted run that finished only the first pair
    std::fs::write(
        &output,
        "Record ID,Language,Translation,Status,Attempts,Notes\n\
         R1,frFR,Rejoignez la Chasse,accepted,1,\n",
    )?;

    let gateway = MockGateway::scripted(vec![MockReply::Text("{Count} victimes".into())]);
    let controller = Controller::with_config(config(&rules_dir))?;
    let summary = controller
        .run_with_gateway(Arc::new(gateway.clone()), &input, &output)
        .await?;

    assert_eq!(summary.already_complete, 1);
    assert_eq!(summary.accepted, 1);
    assert_eq!(gateway.call_count(), 1);

    let content = std::fs::read_to_string(&output)?;
    assert!(content.contains("R1,frFR,Rejoignez la Chasse"));
    assert!(content.contains("R2,frFR,{Count} victimes"));
    Ok(())
}

#[tokio::test]
async fn test_rerun_withMissingRuleset_shouldNotDuplicateSkippedRows() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let rules_dir = common::create_rules_dir(dir.path())?;
    let input = common::create_test_file(
        dir.path(),
        "strings.csv",
        "Record ID,src_enUS\nR1,Join the Hunt\n",
    )?;
    let output = dir.path().join("out.csv");

    let mut run_config = config(&rules_dir);
    run_config.languages = vec!["esES".to_string()];

    let controller = Controller::with_config(run_config.clone())?;
    let first = controller
        .run_with_gateway(Arc::new(MockGateway::working()), &input, &output)
        .await?;
    assert_eq!(first.skipped, 1);

    // Still no esES ruleset: the rerun attempts the pair again, and the
    // fresh skipped row replaces the old one instead of stacking under it
    let controller = Controller::with_config(run_config)?;
    let second = controller
        .run_with_gateway(Arc::new(MockGateway::working()), &input, &output)
        .await?;
    assert_eq!(second.skipped, 1);
    assert_eq!(second.already_complete, 0);

    let content = std::fs::read_to_string(&output)?;
    assert_eq!(content.matches("R1,esES").count(), 1);
    assert_eq!(content.lines().count(), 2); // header + the single skipped row
    Ok(())
}

#[tokio::test]
async fn test_rerun_withEscalatedPairs_shouldNotRetryThem() -> Result<()> {
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
    let controller = Controller::with_config(config(&rules_dir))?;
    let first = controller
        .run_with_gateway(Arc::new(gateway), &input, &output)
        .await?;
    assert_eq!(first.escalated, 1);

    // Escalated rows are terminal; the rerun leaves them for human review
    let second_gateway = MockGateway::working();
    let controller = Controller::with_config(config(&rules_dir))?;
    let second = controller
        .run_with_gateway(Arc::new(second_gateway.clone()), &input, &output)
        .await?;

    assert_eq!(second.already_complete, 1);
    assert_eq!(second_gateway.call_count(), 0);
    Ok(())
}
