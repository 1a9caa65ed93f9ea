// SPDX-License-Identifier: MIT

//! YAML schema types for rule set definitions

use crate::engine::matcher::{AggregationMode, ComparisonMode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level rule set file
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RuleSetDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Rules in declaration order
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

/// A single rule, tagged by `kind`
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleDefinition {
    /// String predicate: `str -> bool`
    #[serde(rename = "string")]
    StringMatch {
        name: String,
        criteria: Vec<String>,
        #[serde(default)]
        comparison: ComparisonMode,
        #[serde(default)]
        aggregation: AggregationMode,
    },
    /// Integer bucketing: `i64 -> String`
    Buckets {
        name: String,
        buckets: Vec<BucketDefinition>,
        /// Label for values above the last bucket
        otherwise: String,
    },
    /// Integer threshold: `i64 -> bool`, true when the value exceeds `above`
    Threshold { name: String, above: i64 },
    /// Weekend/weekday classification: `NaiveDateTime -> String`
    Calendar {
        name: String,
        weekend: String,
        weekday: String,
    },
    /// First-match taxonomy: `str -> Option<String>`
    Taxonomy {
        name: String,
        sub_rules: Vec<SubRuleDefinition>,
    },
    /// Collect-all taxonomy: `str -> Vec<String>`
    TaxonomyMulti {
        name: String,
        sub_rules: Vec<SubRuleDefinition>,
    },
}

/// Inclusive upper bound and its label
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BucketDefinition {
    pub max: i64,
    pub label: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SubRuleDefinition {
    pub criteria: Vec<String>,
    #[serde(default)]
    pub aggregation: AggregationMode,
    #[serde(default)]
    pub comparison: ComparisonMode,
    pub label: String,
}

/// Rule kind without its configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    StringMatch,
    Buckets,
    Threshold,
    Calendar,
    Taxonomy,
    TaxonomyMulti,
}

impl RuleDefinition {
    pub fn name(&self) -> &str {
        match self {
            RuleDefinition::StringMatch { name, .. }
            | RuleDefinition::Buckets { name, .. }
            | RuleDefinition::Threshold { name, .. }
            | RuleDefinition::Calendar { name, .. }
            | RuleDefinition::Taxonomy { name, .. }
            | RuleDefinition::TaxonomyMulti { name, .. } => name,
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            RuleDefinition::StringMatch { .. } => RuleKind::StringMatch,
            RuleDefinition::Buckets { .. } => RuleKind::Buckets,
            RuleDefinition::Threshold { .. } => RuleKind::Threshold,
            RuleDefinition::Calendar { .. } => RuleKind::Calendar,
            RuleDefinition::Taxonomy { .. } => RuleKind::Taxonomy,
            RuleDefinition::TaxonomyMulti { .. } => RuleKind::TaxonomyMulti,
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::StringMatch => write!(f, "string"),
            RuleKind::Buckets => write!(f, "buckets"),
            RuleKind::Threshold => write!(f, "threshold"),
            RuleKind::Calendar => write!(f, "calendar"),
            RuleKind::Taxonomy => write!(f, "taxonomy"),
            RuleKind::TaxonomyMulti => write!(f, "taxonomy_multi"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_rule_defaults() {
        let yaml = r#"
            kind: string
            name: Domain
            criteria: [google.com]
        "#;
        let def: RuleDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            def,
            RuleDefinition::StringMatch {
                name: "Domain".to_string(),
                criteria: vec!["google.com".to_string()],
                comparison: ComparisonMode::FullMatch,
                aggregation: AggregationMode::Any,
            }
        );
        assert_eq!(def.kind(), RuleKind::StringMatch);
    }

    #[test]
    fn test_taxonomy_multi_tag() {
        let yaml = r#"
            kind: taxonomy_multi
            name: Tags
            sub_rules:
              - { criteria: [red], comparison: contains, label: color }
              - { criteria: [a, b], aggregation: all, label: both }
        "#;
        let def: RuleDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(def.name(), "Tags");
        assert_eq!(def.kind(), RuleKind::TaxonomyMulti);
        match def {
            RuleDefinition::TaxonomyMulti { sub_rules, .. } => {
                assert_eq!(sub_rules.len(), 2);
                assert_eq!(sub_rules[0].comparison, ComparisonMode::Contains);
                assert_eq!(sub_rules[0].aggregation, AggregationMode::Any);
                assert_eq!(sub_rules[1].aggregation, AggregationMode::All);
                assert_eq!(sub_rules[1].comparison, ComparisonMode::FullMatch);
            }
            other => panic!("Expected TaxonomyMulti, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let yaml = "kind: regex\nname: R\n";
        assert!(serde_yaml::from_str::<RuleDefinition>(yaml).is_err());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(RuleKind::StringMatch.to_string(), "string");
        assert_eq!(RuleKind::TaxonomyMulti.to_string(), "taxonomy_multi");
    }
}
