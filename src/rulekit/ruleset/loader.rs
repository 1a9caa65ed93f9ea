// SPDX-License-Identifier: MIT

//! Rule set loader - YAML file loading and parsing

use super::types::RuleSetDefinition;
use crate::engine::error::RulekitError;
use std::fs;
use std::path::Path;

/// Loads rule set definitions from YAML files
pub struct RuleSetLoader;

impl RuleSetLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a rule set definition from a YAML file
    pub fn load_file<P: AsRef<Path>>(&self, path: P) -> Result<RuleSetDefinition, RulekitError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let def = Self::parse_yaml(&content)?;
        log::info!(
            "Loaded rule set '{}' with {} rules from {}",
            def.name,
            def.rules.len(),
            path.display()
        );
        Ok(def)
    }

    /// Parse a rule set definition from a YAML string
    pub fn parse_yaml(content: &str) -> Result<RuleSetDefinition, RulekitError> {
        let def: RuleSetDefinition = serde_yaml::from_str(content)?;
        Ok(def)
    }
}

impl Default for RuleSetLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rulekit::ruleset::types::{RuleDefinition, RuleKind};

    #[test]
    fn test_parse_rule_set() {
        let yaml = r#"
name: demo
description: "Demo rules"
rules:
  - kind: string
    name: DomainCheck
    criteria: [google.com, microsoft.com]
    comparison: full_match
    aggregation: any
  - kind: buckets
    name: ColorGrade
    buckets:
      - { max: 50, label: red }
      - { max: 85, label: yellow }
    otherwise: green
  - kind: threshold
    name: GreaterThan50
    above: 50
  - kind: calendar
    name: WeekendCheck
    weekend: Weekend
    weekday: Weekday
"#;
        let def = RuleSetLoader::parse_yaml(yaml).unwrap();
        assert_eq!(def.name, "demo");
        assert_eq!(def.description, "Demo rules");
        let kinds: Vec<RuleKind> = def.rules.iter().map(RuleDefinition::kind).collect();
        assert_eq!(
            kinds,
            vec![
                RuleKind::StringMatch,
                RuleKind::Buckets,
                RuleKind::Threshold,
                RuleKind::Calendar
            ]
        );
    }

    #[test]
    fn test_parse_without_rules() {
        let def = RuleSetLoader::parse_yaml("name: empty\n").unwrap();
        assert!(def.rules.is_empty());
        assert!(def.description.is_empty());
    }

    #[test]
    fn test_invalid_yaml_returns_error() {
        let yaml = r#"
name:
  - invalid structure
"#;
        let result = RuleSetLoader::parse_yaml(yaml);
        assert!(matches!(result, Err(RulekitError::Yaml(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = RuleSetLoader::new().load_file("does/not/exist.yaml");
        assert!(matches!(result, Err(RulekitError::Io(_))));
    }
}
