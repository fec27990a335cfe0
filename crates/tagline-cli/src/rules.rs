//! Tagging rules loaded from rule files and `--match` options
//!
//! A rule file lists `{ tag, pattern }` pairs under `rule`:
//!
//! ```toml
//! [[rule]]
//! tag = "begin"
//! pattern = "^# BEGIN"
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tagline_core::{Classifier, PatternClassifier};

use crate::error::{CliError, Result};

/// One tag and the pattern that applies it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Rule {
    pub tag: String,
    pub pattern: String,
}

/// An ordered list of rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RuleSet {
    #[serde(default, rename = "rule")]
    pub rules: Vec<Rule>,
}

impl RuleSet {
    /// Load rules from a file.
    ///
    /// Format is detected from file extension:
    /// - `.toml` -> TOML
    /// - `.json` -> JSON
    /// - `.yaml`, `.yml` -> YAML
    pub fn load(path: &Path) -> Result<Self> {
        let rules_error = |message: String| CliError::Rules {
            path: path.to_path_buf(),
            message,
        };

        let content = fs::read_to_string(path).map_err(|e| rules_error(e.to_string()))?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        let rules: RuleSet = match extension.as_str() {
            "toml" => toml::from_str(&content).map_err(|e| rules_error(e.to_string()))?,
            "json" => serde_json::from_str(&content).map_err(|e| rules_error(e.to_string()))?,
            "yaml" | "yml" => {
                serde_yaml::from_str(&content).map_err(|e| rules_error(e.to_string()))?
            }
            other => {
                return Err(rules_error(format!("unsupported format `{}`", other)));
            }
        };

        tracing::debug!(path = %path.display(), rules = rules.rules.len(), "Loaded rules");
        Ok(rules)
    }

    /// Append a rule written as `TAG=REGEX`.
    pub fn push_inline(&mut self, spec: &str) -> Result<()> {
        let (tag, pattern) = spec
            .split_once('=')
            .ok_or_else(|| CliError::user(format!("Expected TAG=REGEX, got `{}`", spec)))?;
        self.rules.push(Rule {
            tag: tag.to_string(),
            pattern: pattern.to_string(),
        });
        Ok(())
    }

    /// Compile every rule into a classifier, in order.
    pub fn classifiers(&self) -> Result<Vec<PatternClassifier>> {
        self.rules
            .iter()
            .map(|rule| PatternClassifier::new(rule.tag.as_str(), &rule.pattern).map_err(CliError::from))
            .collect()
    }
}

/// Borrow compiled classifiers in the form `Document::scan` takes.
pub fn as_dyn(classifiers: &[PatternClassifier]) -> Vec<&dyn Classifier> {
    classifiers.iter().map(|c| c as &dyn Classifier).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn load_toml_rules() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "rules.toml",
            "[[rule]]\ntag = \"begin\"\npattern = \"^# BEGIN\"\n\n[[rule]]\ntag = \"end\"\npattern = \"^# END\"\n",
        );

        let rules = RuleSet::load(&path).unwrap();
        assert_eq!(rules.rules.len(), 2);
        assert_eq!(rules.rules[0].tag, "begin");
        assert_eq!(rules.rules[1].pattern, "^# END");
    }

    #[test]
    fn load_json_rules() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "rules.json",
            r#"{"rule": [{"tag": "x", "pattern": "^x$"}]}"#,
        );

        let rules = RuleSet::load(&path).unwrap();
        assert_eq!(
            rules.rules,
            vec![Rule {
                tag: "x".into(),
                pattern: "^x$".into()
            }]
        );
    }

    #[test]
    fn load_yaml_rules() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "rules.yml",
            "rule:\n  - tag: y\n    pattern: \"^y\"\n",
        );

        let rules = RuleSet::load(&path).unwrap();
        assert_eq!(rules.rules[0].tag, "y");
    }

    #[test]
    fn load_unknown_extension_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "rules.ini", "tag=x");

        let err = RuleSet::load(&path).unwrap_err();
        assert!(matches!(err, CliError::Rules { .. }));
        assert!(err.to_string().contains("unsupported format"));
    }

    #[test]
    fn inline_rule_splits_on_first_equals() {
        let mut rules = RuleSet::default();
        rules.push_inline("assign=^\\w+=").unwrap();
        assert_eq!(rules.rules[0].tag, "assign");
        assert_eq!(rules.rules[0].pattern, "^\\w+=");

        assert!(rules.push_inline("no-separator").is_err());
    }

    #[test]
    fn classifiers_reject_bad_patterns() {
        let mut rules = RuleSet::default();
        rules.push_inline("bad=(").unwrap();
        assert!(matches!(
            rules.classifiers(),
            Err(CliError::Core(tagline_core::Error::InvalidPattern { .. }))
        ));
    }
}
