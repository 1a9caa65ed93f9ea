// SPDX-License-Identifier: MIT

//! Criteria matching
//!
//! A value is compared against every criterion with a [`ComparisonMode`],
//! and the per-criterion verdicts are folded with an [`AggregationMode`].
//! All comparisons ignore case. Case folding is per character: a character
//! whose lowercase form is a single character is replaced by it, any other
//! character (such as `'İ'`) is compared as is. Folding never changes the
//! character count, so `"İx"` does not start with `"i"`.
//!
//! Empty criteria lists follow quantifier conventions: `All` and `None`
//! are vacuously true, `Any` is false.

use serde::{Deserialize, Serialize};

/// How a single criterion is compared against the value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    /// Whole-string equality
    #[default]
    FullMatch,
    /// Criterion appears anywhere in the value
    Contains,
    /// Value begins with the criterion
    StartsWith,
    /// Value ends with the criterion
    EndsWith,
}

/// How per-criterion verdicts combine into one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationMode {
    /// Every criterion must match
    All,
    /// At least one criterion must match
    #[default]
    Any,
    /// No criterion may match
    None,
}

impl ComparisonMode {
    /// Compare an already-lowercased value with an already-lowercased criterion
    fn compare(self, value: &str, criterion: &str) -> bool {
        match self {
            ComparisonMode::FullMatch => value == criterion,
            ComparisonMode::Contains => value.contains(criterion),
            ComparisonMode::StartsWith => value.starts_with(criterion),
            ComparisonMode::EndsWith => value.ends_with(criterion),
        }
    }
}

impl std::fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComparisonMode::FullMatch => write!(f, "full_match"),
            ComparisonMode::Contains => write!(f, "contains"),
            ComparisonMode::StartsWith => write!(f, "starts_with"),
            ComparisonMode::EndsWith => write!(f, "ends_with"),
        }
    }
}

impl std::fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AggregationMode::All => write!(f, "all"),
            AggregationMode::Any => write!(f, "any"),
            AggregationMode::None => write!(f, "none"),
        }
    }
}

/// Lowercase `text` one character at a time, keeping characters whose
/// lowercase form expands to several characters
fn fold_case(text: &str) -> String {
    text.chars()
        .map(|c| {
            let mut lower = c.to_lowercase();
            match (lower.next(), lower.next()) {
                (Some(single), None) => single,
                _ => c,
            }
        })
        .collect()
}

/// Fold per-criterion verdicts for an already case-folded value
fn aggregate<'a, I>(
    value: &str,
    folded_criteria: I,
    comparison: ComparisonMode,
    aggregation: AggregationMode,
) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    let mut verdicts = folded_criteria
        .into_iter()
        .map(|criterion| comparison.compare(value, criterion));

    match aggregation {
        AggregationMode::All => verdicts.all(|m| m),
        AggregationMode::Any => verdicts.any(|m| m),
        AggregationMode::None => verdicts.all(|m| !m),
    }
}

/// Match `value` against `criteria`
pub fn is_match<S: AsRef<str>>(
    value: &str,
    criteria: &[S],
    comparison: ComparisonMode,
    aggregation: AggregationMode,
) -> bool {
    let folded: Vec<String> = criteria.iter().map(|c| fold_case(c.as_ref())).collect();
    aggregate(
        &fold_case(value),
        folded.iter().map(String::as_str),
        comparison,
        aggregation,
    )
}

/// A fixed matching configuration owned by a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matcher {
    criteria: Vec<String>,
    folded: Vec<String>,
    comparison: ComparisonMode,
    aggregation: AggregationMode,
}

impl Matcher {
    pub fn new<I, S>(criteria: I, comparison: ComparisonMode, aggregation: AggregationMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let criteria: Vec<String> = criteria.into_iter().map(Into::into).collect();
        let folded = criteria.iter().map(|c| fold_case(c)).collect();
        Self {
            criteria,
            folded,
            comparison,
            aggregation,
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        aggregate(
            &fold_case(value),
            self.folded.iter().map(String::as_str),
            self.comparison,
            self.aggregation,
        )
    }

    pub fn criteria(&self) -> &[String] {
        &self.criteria
    }

    pub fn comparison(&self) -> ComparisonMode {
        self.comparison
    }

    pub fn aggregation(&self) -> AggregationMode {
        self.aggregation
    }
}
