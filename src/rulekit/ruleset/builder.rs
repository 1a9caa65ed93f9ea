// SPDX-License-Identifier: MIT

//! Builds a populated `RulesManager` from a rule set definition

use super::types::{
    BucketDefinition, RuleDefinition, RuleKind, RuleSetDefinition, SubRuleDefinition,
};
use crate::engine::error::{RuleError, RulekitError};
use crate::engine::rule::{DateTimeRule, NumberRule, RuleSignature, StringRule};
use crate::engine::taxonomy::{TaxonomyRule, TaxonomyRuleMulti};
use crate::engine::RulesManager;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde_json::{to_value, Value};
use std::collections::HashMap;

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Turns rule set definitions into rule sets
pub struct RuleSetBuilder;

impl RuleSetBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build every rule of `def`. Nothing is returned unless all rules build.
    pub fn build(&self, def: &RuleSetDefinition) -> Result<RuleSet, RuleError> {
        let mut manager = RulesManager::new();
        let mut kinds = HashMap::new();

        for rule in &def.rules {
            Self::register(&mut manager, rule)?;
            kinds.insert(rule.name().to_string(), rule.kind());
        }

        log::info!("Built rule set '{}' ({} rules)", def.name, manager.len());
        Ok(RuleSet {
            name: def.name.clone(),
            manager,
            kinds,
        })
    }

    fn register(manager: &mut RulesManager, def: &RuleDefinition) -> Result<(), RuleError> {
        let name = def.name();
        if name.trim().is_empty() {
            return Err(RuleError::invalid_config(name, "rule name is empty"));
        }

        match def {
            RuleDefinition::StringMatch {
                criteria,
                comparison,
                aggregation,
                ..
            } => manager.add_rule(StringRule::new(
                name,
                criteria.iter().cloned(),
                *comparison,
                *aggregation,
            )),
            RuleDefinition::Buckets {
                buckets, otherwise, ..
            } => {
                validate_buckets(name, buckets)?;
                let buckets = buckets.clone();
                let otherwise = otherwise.clone();
                manager.add_rule(NumberRule::new(name, move |value| {
                    buckets
                        .iter()
                        .find(|bucket| value <= bucket.max)
                        .map(|bucket| bucket.label.clone())
                        .unwrap_or_else(|| otherwise.clone())
                }))
            }
            RuleDefinition::Threshold { above, .. } => {
                let above = *above;
                manager.add_rule(NumberRule::new(name, move |value| value > above))
            }
            RuleDefinition::Calendar {
                weekend, weekday, ..
            } => {
                let weekend = weekend.clone();
                let weekday = weekday.clone();
                manager.add_rule(DateTimeRule::new(name, move |at: NaiveDateTime| {
                    match at.weekday() {
                        Weekday::Sat | Weekday::Sun => weekend.clone(),
                        _ => weekday.clone(),
                    }
                }))
            }
            RuleDefinition::Taxonomy { sub_rules, .. } => {
                validate_sub_rules(name, sub_rules)?;
                let mut rule = TaxonomyRule::new(name);
                for sub in sub_rules {
                    rule.add_sub_rule(
                        sub.criteria.iter().cloned(),
                        sub.aggregation,
                        sub.label.clone(),
                        sub.comparison,
                    );
                }
                manager.add_rule(rule)
            }
            RuleDefinition::TaxonomyMulti { sub_rules, .. } => {
                validate_sub_rules(name, sub_rules)?;
                let mut rule = TaxonomyRuleMulti::new(name);
                for sub in sub_rules {
                    rule.add_sub_rule(
                        sub.criteria.iter().cloned(),
                        sub.aggregation,
                        sub.label.clone(),
                        sub.comparison,
                    );
                }
                manager.add_rule(rule)
            }
        }
    }
}

impl Default for RuleSetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_buckets(name: &str, buckets: &[BucketDefinition]) -> Result<(), RuleError> {
    if buckets.is_empty() {
        return Err(RuleError::invalid_config(name, "at least one bucket is required"));
    }
    for pair in buckets.windows(2) {
        if pair[1].max <= pair[0].max {
            return Err(RuleError::invalid_config(
                name,
                format!(
                    "bucket bounds must be strictly ascending ({} follows {})",
                    pair[1].max, pair[0].max
                ),
            ));
        }
    }
    Ok(())
}

fn validate_sub_rules(name: &str, sub_rules: &[SubRuleDefinition]) -> Result<(), RuleError> {
    match sub_rules.iter().position(|sub| sub.label.trim().is_empty()) {
        Some(index) => Err(RuleError::invalid_config(
            name,
            format!("sub-rule {} has an empty label", index),
        )),
        None => Ok(()),
    }
}

/// A built rule set: the populated manager plus each rule's kind
#[derive(Debug)]
pub struct RuleSet {
    name: String,
    manager: RulesManager,
    kinds: HashMap<String, RuleKind>,
}

impl RuleSet {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn manager(&self) -> &RulesManager {
        &self.manager
    }

    pub fn kind(&self, rule: &str) -> Option<RuleKind> {
        self.kinds.get(rule).copied()
    }

    /// Rule names with their declared signatures, sorted by name
    pub fn describe(&self) -> Vec<(&str, RuleKind, RuleSignature)> {
        self.manager
            .names()
            .into_iter()
            .filter_map(|name| {
                let kind = self.kind(name)?;
                let signature = self.manager.signature(name)?;
                Some((name, kind, signature))
            })
            .collect()
    }

    /// Evaluate a rule from raw text, rendering the result as JSON.
    ///
    /// The text is parsed according to the rule's declared input type.
    pub fn evaluate_raw(&self, rule: &str, raw: &str) -> Result<Value, RulekitError> {
        let kind = self
            .kind(rule)
            .ok_or_else(|| RuleError::RuleNotFound(rule.to_string()))?;
        let m = &self.manager;

        let value = match kind {
            RuleKind::StringMatch => to_value(m.evaluate::<str, bool>(rule, raw)?)?,
            RuleKind::Buckets => {
                let input = parse_integer(rule, raw)?;
                to_value(m.evaluate::<i64, String>(rule, &input)?)?
            }
            RuleKind::Threshold => {
                let input = parse_integer(rule, raw)?;
                to_value(m.evaluate::<i64, bool>(rule, &input)?)?
            }
            RuleKind::Calendar => {
                let input = parse_timestamp(rule, raw)?;
                to_value(m.evaluate::<NaiveDateTime, String>(rule, &input)?)?
            }
            RuleKind::Taxonomy => to_value(m.evaluate::<str, Option<String>>(rule, raw)?)?,
            RuleKind::TaxonomyMulti => to_value(m.evaluate::<str, Vec<String>>(rule, raw)?)?,
        };
        Ok(value)
    }
}

fn parse_integer(rule: &str, raw: &str) -> Result<i64, RulekitError> {
    raw.trim().parse::<i64>().map_err(|e| {
        RulekitError::invalid_input(rule, format!("'{}' is not an integer: {}", raw, e))
    })
}

fn parse_timestamp(rule: &str, raw: &str) -> Result<NaiveDateTime, RulekitError> {
    let raw = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| {
            RulekitError::invalid_input(
                rule,
                format!("'{}' is not a timestamp (expected YYYY-MM-DD[THH:MM:SS])", raw),
            )
        })
}
