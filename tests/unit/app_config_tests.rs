/*!
 * Configuration loading and validation tests
 */

use anyhow::Result;
use gameloc::app_config::{Config, LogLevel};
use gameloc::qa::Severity;

use crate::common;

#[test]
fn test_defaultConfig_shouldCarryDocumentedDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "enUS");
    assert!(config.languages.is_empty());
    assert_eq!(config.rules_dir, "rules");
    assert_eq!(config.provider.model, "gpt-4o-mini");
    assert_eq!(config.pipeline.max_attempts, 3);
    assert!(config.pipeline.auto_retry);
    assert_eq!(config.pipeline.blocking_severity, Severity::Critical);
    assert_eq!(config.log_level, LogLevel::Info);
}

#[test]
fn test_loadConfig_fromPartialJson_shouldFillDefaults() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        dir.path(),
        "conf.json",
        r#"{
            "languages": ["frFR"],
            "pipeline": { "auto_retry": false }
        }"#,
    )?;

    let config = Config::from_file(&path)?;

    assert_eq!(config.languages, vec!["frFR"]);
    assert!(!config.pipeline.auto_retry);
    assert_eq!(config.pipeline.max_attempts, 3);
    assert_eq!(config.provider.timeout_secs, 120);
    Ok(())
}

#[test]
fn test_loadConfig_withMalformedJson_shouldError() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(dir.path(), "conf.json", "{ not json")?;

    assert!(Config::from_file(&path).is_err());
    Ok(())
}

#[test]
fn test_saveAndReload_shouldRoundTrip() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("conf.json");

    let mut config = Config::default();
    config.languages = vec!["deDE".to_string(), "frFR".to_string()];
    config.pipeline.blocking_severity = Severity::High;
    config.to_file(&path)?;

    let loaded = Config::from_file(&path)?;
    assert_eq!(loaded.languages, vec!["deDE", "frFR"]);
    assert_eq!(loaded.pipeline.blocking_severity, Severity::High);
    Ok(())
}

#[test]
fn test_validate_withZeroConcurrency_shouldError() {
    let mut config = Config::default();
    config.pipeline.concurrency = 0;
    assert!(config.validate().is_err());
}
