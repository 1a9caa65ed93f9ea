// SPDX-License-Identifier: MIT

//! Typed rule evaluation engine
//!
//! This module provides:
//! - `Matcher` - criteria matching with comparison and aggregation modes
//! - `Rule` - the trait every rule kind implements, plus the built-in kinds
//! - `TaxonomyRule` / `TaxonomyRuleMulti` - ordered sub-rule classifiers
//! - `RulesManager` - name-keyed registry with type-checked evaluation

pub mod error;
pub mod manager;
pub mod matcher;
pub mod rule;
pub mod taxonomy;

pub use error::{EmailError, RuleError, RulekitError};
pub use manager::RulesManager;
pub use matcher::{is_match, AggregationMode, ComparisonMode, Matcher};
pub use rule::{DateTimeRule, NumberRule, Rule, RuleSignature, StringRule};
pub use taxonomy::{SubRule, TaxonomyRule, TaxonomyRuleMulti};
