// SPDX-License-Identifier: MIT

//! Declarative rule sets
//!
//! Rule sets are YAML files listing rules by kind. They are loaded with
//! `RuleSetLoader`, turned into a populated `RulesManager` by
//! `RuleSetBuilder`, and evaluated from raw text through `RuleSet`.

pub mod builder;
pub mod loader;
pub mod types;

pub use builder::{RuleSet, RuleSetBuilder};
pub use loader::RuleSetLoader;
pub use types::{BucketDefinition, RuleDefinition, RuleKind, RuleSetDefinition, SubRuleDefinition};
