// SPDX-License-Identifier: MIT

//! Taxonomy rules
//!
//! A taxonomy is an ordered list of sub-rules, each pairing a matching
//! configuration with a label. Two termination policies are provided as
//! separate rule kinds:
//! - [`TaxonomyRule`] stops at the first matching sub-rule
//! - [`TaxonomyRuleMulti`] collects the label of every matching sub-rule

use super::matcher::{AggregationMode, ComparisonMode, Matcher};
use super::rule::Rule;

/// One classification step inside a taxonomy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubRule {
    matcher: Matcher,
    label: String,
}

impl SubRule {
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    fn matches(&self, value: &str) -> bool {
        self.matcher.matches(value)
    }
}

/// Append-only, ordered sub-rule list shared by both taxonomy kinds
#[derive(Debug, Clone, Default)]
struct Taxonomy {
    sub_rules: Vec<SubRule>,
}

impl Taxonomy {
    fn push<I, S>(
        &mut self,
        criteria: I,
        aggregation: AggregationMode,
        label: impl Into<String>,
        comparison: ComparisonMode,
    ) where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sub_rules.push(SubRule {
            matcher: Matcher::new(criteria, comparison, aggregation),
            label: label.into(),
        });
    }

    fn matching<'a>(&'a self, value: &'a str) -> impl Iterator<Item = &'a SubRule> + 'a {
        self.sub_rules.iter().filter(move |sub| sub.matches(value))
    }
}

/// First-match taxonomy: `str -> Option<String>`
#[derive(Debug, Clone)]
pub struct TaxonomyRule {
    name: String,
    taxonomy: Taxonomy,
}

impl TaxonomyRule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            taxonomy: Taxonomy::default(),
        }
    }

    /// Append a sub-rule; earlier sub-rules take precedence
    pub fn add_sub_rule<I, S>(
        &mut self,
        criteria: I,
        aggregation: AggregationMode,
        result: impl Into<String>,
        comparison: ComparisonMode,
    ) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.taxonomy.push(criteria, aggregation, result, comparison);
        self
    }

    pub fn sub_rules(&self) -> &[SubRule] {
        &self.taxonomy.sub_rules
    }
}

impl Rule for TaxonomyRule {
    type Input = str;
    type Output = Option<String>;

    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, input: &str) -> Option<String> {
        // Iterator is lazy, so later sub-rules are never checked once one matches
        self.taxonomy
            .matching(input)
            .next()
            .map(|sub| sub.label.clone())
    }
}

/// Collect-all taxonomy: `str -> Vec<String>`, labels in registration order
#[derive(Debug, Clone)]
pub struct TaxonomyRuleMulti {
    name: String,
    taxonomy: Taxonomy,
}

impl TaxonomyRuleMulti {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            taxonomy: Taxonomy::default(),
        }
    }

    pub fn add_sub_rule<I, S>(
        &mut self,
        criteria: I,
        aggregation: AggregationMode,
        result: impl Into<String>,
        comparison: ComparisonMode,
    ) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.taxonomy.push(criteria, aggregation, result, comparison);
        self
    }

    pub fn sub_rules(&self) -> &[SubRule] {
        &self.taxonomy.sub_rules
    }
}

impl Rule for TaxonomyRuleMulti {
    type Input = str;
    type Output = Vec<String>;

    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, input: &str) -> Vec<String> {
        self.taxonomy
            .matching(input)
            .map(|sub| sub.label.clone())
            .collect()
    }
}
