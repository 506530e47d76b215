/*!
 * Common test utilities for the gameloc test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a rules directory with frFR, deDE and global rulesets
pub fn create_rules_dir(dir: &Path) -> Result<PathBuf> {
    let rules_dir = dir.join("rules");
    fs::create_dir_all(&rules_dir)?;

    fs::write(
        rules_dir.join("frFR_ruleset.md"),
        r#"# frFR Ruleset

## Glossary

| English | frFR |
|---------|------|
| Hunt | Chasse |
| Ability | Compétence |

## Style Guide

- Use the infinitive for button labels
- forbidden: `  +` no double spaces
"#,
    )?;

    fs::write(
        rules_dir.join("deDE_ruleset.md"),
        r#"# deDE Ruleset

## Glossary

| English | deDE |
|---------|------|
| Hunt | Jagd |
"#,
    )?;

    fs::write(
        rules_dir.join("global_ruleset.md"),
        r#"# Global Ruleset

## General Rules

- Keep translations close to the source length
"#,
    )?;

    Ok(rules_dir)
}

/// Creates a sample input CSV in the export format
pub fn create_input_csv(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = "Record ID,src_enUS,Context,Path\n\
                   R1,Join the Hunt,Lobby banner,UI/Lobby\n\
                   R2,{Count} kills,Scoreboard,UI/Score\n";
    create_test_file(dir, filename, content)
}
