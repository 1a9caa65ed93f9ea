// SPDX-License-Identifier: MIT

//! Rule trait and the basic rule kinds
//!
//! A rule is a named, pure mapping from one declared input type to one
//! declared output type. The declared pair is exposed as a
//! [`RuleSignature`] so a type-erased registry can check it before
//! handing the input over.

use super::matcher::{AggregationMode, ComparisonMode, Matcher};
use chrono::NaiveDateTime;
use std::any::{type_name, TypeId};
use std::fmt;

/// Trait for rules that can be registered in a [`RulesManager`].
///
/// Implementations must be pure: the same input always yields the same
/// output and evaluation never mutates the rule.
///
/// [`RulesManager`]: super::manager::RulesManager
pub trait Rule: Send + Sync {
    /// Input type the rule accepts (may be unsized, e.g. `str`)
    type Input: ?Sized + 'static;

    /// Output type the rule produces
    type Output: 'static;

    /// Returns the rule name (unique within a registry)
    fn name(&self) -> &str;

    /// Evaluate the rule against a value
    fn evaluate(&self, input: &Self::Input) -> Self::Output;
}

/// Declared input/output types of a rule
#[derive(Debug, Clone, Copy)]
pub struct RuleSignature {
    input: TypeId,
    output: TypeId,
    input_name: &'static str,
    output_name: &'static str,
}

impl RuleSignature {
    pub fn of<I: ?Sized + 'static, O: 'static>() -> Self {
        Self {
            input: TypeId::of::<I>(),
            output: TypeId::of::<O>(),
            input_name: type_name::<I>(),
            output_name: type_name::<O>(),
        }
    }

    /// Input type name without module paths
    pub fn input_name(&self) -> String {
        short_type_name(self.input_name)
    }

    /// Output type name without module paths
    pub fn output_name(&self) -> String {
        short_type_name(self.output_name)
    }
}

impl PartialEq for RuleSignature {
    fn eq(&self, other: &Self) -> bool {
        self.input == other.input && self.output == other.output
    }
}

impl Eq for RuleSignature {}

impl fmt::Display for RuleSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.input_name(), self.output_name())
    }
}

/// `core::option::Option<alloc::string::String>` -> `Option<String>`
fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    for c in full.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            segment.push(c);
        } else {
            out.push_str(segment.rsplit("::").next().unwrap_or(""));
            segment.clear();
            out.push(c);
        }
    }
    out.push_str(segment.rsplit("::").next().unwrap_or(""));
    out
}

/// String predicate rule backed by a [`Matcher`]
#[derive(Debug, Clone)]
pub struct StringRule {
    name: String,
    matcher: Matcher,
}

impl StringRule {
    pub fn new<I, S>(
        name: impl Into<String>,
        criteria: I,
        comparison: ComparisonMode,
        aggregation: AggregationMode,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            matcher: Matcher::new(criteria, comparison, aggregation),
        }
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }
}

impl Rule for StringRule {
    type Input = str;
    type Output = bool;

    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, input: &str) -> bool {
        self.matcher.matches(input)
    }
}

/// Numeric rule mapping an integer onto a caller-chosen result.
///
/// The mapping must be total; the engine does not inspect its domain.
pub struct NumberRule<R> {
    name: String,
    mapping: Box<dyn Fn(i64) -> R + Send + Sync>,
}

impl<R> NumberRule<R> {
    pub fn new<F>(name: impl Into<String>, mapping: F) -> Self
    where
        F: Fn(i64) -> R + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            mapping: Box::new(mapping),
        }
    }
}

impl<R: 'static> Rule for NumberRule<R> {
    type Input = i64;
    type Output = R;

    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, input: &i64) -> R {
        (self.mapping)(*input)
    }
}

impl<R> fmt::Debug for NumberRule<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumberRule").field("name", &self.name).finish()
    }
}

/// Temporal rule classifying a calendar timestamp
pub struct DateTimeRule<R> {
    name: String,
    mapping: Box<dyn Fn(NaiveDateTime) -> R + Send + Sync>,
}

impl<R> DateTimeRule<R> {
    pub fn new<F>(name: impl Into<String>, mapping: F) -> Self
    where
        F: Fn(NaiveDateTime) -> R + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            mapping: Box::new(mapping),
        }
    }
}

impl<R: 'static> Rule for DateTimeRule<R> {
    type Input = NaiveDateTime;
    type Output = R;

    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, input: &NaiveDateTime) -> R {
        (self.mapping)(*input)
    }
}

impl<R> fmt::Debug for DateTimeRule<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateTimeRule")
            .field("name", &self.name)
            .finish()
    }
}
