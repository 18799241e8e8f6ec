//! This module provides the `RuleSetLoader` struct, responsible for loading rule sets stored as
//! JSON from files, strings and directories. Every loaded rule set is analyzed before it is
//! handed out.

use crate::analyzer::analyze;
use crate::types::{RuleSet, TuringMachineError};
use std::fs;
use std::path::{Path, PathBuf};

/// `RuleSetLoader` is a utility struct for loading rule sets.
pub struct RuleSetLoader;

impl RuleSetLoader {
    /// Loads a single rule set from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * `Err(TuringMachineError::ConfigurationError)` if the content is not a valid rule set.
    pub fn load_rules(path: &Path) -> Result<RuleSet, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Self::load_rules_from_string(&content)
    }

    /// Loads a single rule set from JSON content.
    ///
    /// A missing required field (for example `blank`) is a configuration error.
    pub fn load_rules_from_string(content: &str) -> Result<RuleSet, TuringMachineError> {
        let rules: RuleSet = serde_json::from_str(content).map_err(|e| {
            TuringMachineError::ConfigurationError(format!("Invalid rule set: {}", e))
        })?;

        analyze(&rules)?;

        Ok(rules)
    }

    /// Serializes a rule set as pretty-printed JSON.
    pub fn to_json(rules: &RuleSet) -> Result<String, TuringMachineError> {
        serde_json::to_string_pretty(rules).map_err(|e| {
            TuringMachineError::ConfigurationError(format!("Failed to serialize rule set: {}", e))
        })
    }

    /// Loads all rule set files (`.json` extension) from a given directory.
    ///
    /// Directories and other files are skipped. Each element of the result is either the path
    /// and its rule set, or the error that occurred while loading that file.
    pub fn load_rules_dir(directory: &Path) -> Vec<Result<(PathBuf, RuleSet), TuringMachineError>> {
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringMachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let path = match entry {
                    Ok(entry) => entry.path(),
                    Err(e) => {
                        return Some(Err(TuringMachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                if path.is_dir() || path.extension().is_none_or(|ext| ext != "json") {
                    return None;
                }

                Some(Self::load_rules(&path).map(|rules| (path, rules)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::password_rules;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    const TINY: &str = r#"{
        "name": "tiny",
        "states": ["q0", "yes", "no"],
        "inputAlphabet": ["a"],
        "tapeAlphabet": ["a", "_"],
        "transitions": {
            "q0": {
                "a": { "nextState": "yes", "write": "a", "direction": "Right" }
            }
        },
        "startState": "q0",
        "acceptState": "yes",
        "rejectState": "no",
        "blank": "_"
    }"#;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_valid_rules() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "tiny.json", TINY);

        let rules = RuleSetLoader::load_rules(&path).unwrap();

        assert_eq!(rules.name, "tiny");
        assert_eq!(rules.blank, '_');
        assert_eq!(rules.transition("q0", 'a').unwrap().next_state, "yes");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempdir().unwrap();
        let result = RuleSetLoader::load_rules(&dir.path().join("absent.json"));

        assert!(matches!(result, Err(TuringMachineError::FileError(_))));
    }

    #[test]
    fn test_missing_blank_is_configuration_error() {
        let content = TINY.replace(r#""blank": "_""#, r#""comment": "none""#);
        let result = RuleSetLoader::load_rules_from_string(&content);

        match result {
            Err(TuringMachineError::ConfigurationError(msg)) => assert!(msg.contains("blank")),
            other => panic!("Expected a configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_inconsistent_rules_are_rejected() {
        let content = TINY.replace(r#""rejectState": "no""#, r#""rejectState": "yes""#);
        let result = RuleSetLoader::load_rules_from_string(&content);

        assert!(matches!(
            result,
            Err(TuringMachineError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_password_rules_survive_json() {
        let rules = password_rules().unwrap();
        let json = RuleSetLoader::to_json(&rules).unwrap();

        let loaded = RuleSetLoader::load_rules_from_string(&json).unwrap();
        assert_eq!(loaded, rules);
    }

    #[test]
    fn test_load_rules_from_directory() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "valid.json", TINY);
        write_file(dir.path(), "invalid.json", "{ not json");
        write_file(dir.path(), "ignored.txt", "This file should be ignored");

        let results = RuleSetLoader::load_rules_dir(dir.path());

        assert_eq!(results.len(), 2);
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempdir().unwrap();
        let results = RuleSetLoader::load_rules_dir(&dir.path().join("nope"));

        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(TuringMachineError::FileError(_))));
    }
}
