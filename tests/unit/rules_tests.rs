/*!
 * Ruleset directory loading tests
 */

use anyhow::Result;
use gameloc::rules::RulesetStore;

use crate::common;

#[test]
fn test_loadDir_shouldExposeLanguagesAndGlobalRules() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let rules_dir = common::create_rules_dir(dir.path())?;

    let store = RulesetStore::load_dir(&rules_dir)?;

    assert_eq!(
        store.supported_languages(),
        vec!["deDE".to_string(), "frFR".to_string()]
    );
    assert_eq!(store.global_rules().len(), 1);

    let fr = store.get("frFR").expect("frFR ruleset");
    assert_eq!(fr.glossary.get("Hunt").map(String::as_str), Some("Chasse"));
    assert_eq!(fr.rules.len(), 2);
    Ok(())
}

#[test]
fn test_loadDir_shouldIgnoreNonMarkdownFiles() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let rules_dir = common::create_rules_dir(dir.path())?;
    common::create_test_file(&rules_dir, "notes.txt", "## Glossary\n| A | B |\n")?;

    let store = RulesetStore::load_dir(&rules_dir)?;

    assert!(store.get("notes").is_none());
    Ok(())
}

#[test]
fn test_loadDir_withBrokenFile_shouldKeepOtherLanguages() -> Result<()> {
    let dir = common::create_temp_dir()?;
    let rules_dir = common::create_rules_dir(dir.path())?;
    // No sections at all: parses to an empty ruleset, still registered
    common::create_test_file(&rules_dir, "esES_ruleset.md", "plain prose")?;

    let store = RulesetStore::load_dir(&rules_dir)?;

    assert!(store.get("frFR").is_some());
    assert!(store.get("deDE").is_some());
    Ok(())
}

#[test]
fn test_loadDir_withEmptyDirectory_shouldError() -> Result<()> {
    let dir = common::create_temp_dir()?;
    assert!(RulesetStore::load_dir(dir.path()).is_err());
    Ok(())
}
