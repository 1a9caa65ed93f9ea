// SPDX-License-Identifier: MIT

//! Rule registry with type-checked dispatch
//!
//! Rules of any input/output pair live side by side in one map. Each
//! entry records the rule's [`RuleSignature`]; `evaluate` compares it
//! with the requested types before the rule is recovered and invoked.
//!
//! Registration needs `&mut self` and evaluation only `&self`, so a
//! manager that has been fully populated can be shared (e.g. behind an
//! `Arc`) and evaluated from many threads without locking.

use super::error::RuleError;
use super::rule::{Rule, RuleSignature};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

/// Shared handle to a rule with a known input/output pair
pub type DynRule<I, O> = Arc<dyn Rule<Input = I, Output = O>>;

struct RuleEntry {
    signature: RuleSignature,
    /// Always holds a `DynRule<I, O>` matching `signature`
    rule: Box<dyn Any + Send + Sync>,
}

#[derive(Default)]
pub struct RulesManager {
    rules: HashMap<String, RuleEntry>,
}

impl RulesManager {
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Register a rule under its own name.
    ///
    /// Fails with [`RuleError::DuplicateRuleName`] if the name is taken;
    /// the existing rule is left untouched.
    pub fn add_rule<R>(&mut self, rule: R) -> Result<(), RuleError>
    where
        R: Rule + 'static,
    {
        self.add_shared::<R::Input, R::Output>(Arc::new(rule))
    }

    /// Register a rule that is already behind an `Arc`
    pub fn add_shared<I, O>(&mut self, rule: DynRule<I, O>) -> Result<(), RuleError>
    where
        I: ?Sized + 'static,
        O: 'static,
    {
        let name = rule.name().to_string();
        if self.rules.contains_key(&name) {
            log::warn!("Rejected duplicate rule '{}'", name);
            return Err(RuleError::DuplicateRuleName(name));
        }

        let signature = RuleSignature::of::<I, O>();
        log::debug!("Registered rule '{}' ({})", name, signature);
        self.rules.insert(
            name,
            RuleEntry {
                signature,
                rule: Box::new(rule),
            },
        );
        Ok(())
    }

    /// Evaluate the rule `name` as an `I -> O` rule.
    ///
    /// The declared types are checked before the rule runs; a rule whose
    /// signature differs is never invoked.
    pub fn evaluate<I, O>(&self, name: &str, value: &I) -> Result<O, RuleError>
    where
        I: ?Sized + 'static,
        O: 'static,
    {
        let rule = self.lookup::<I, O>(name)?;
        let result = rule.evaluate(value);
        log::debug!("Evaluated rule '{}'", name);
        Ok(result)
    }

    fn lookup<I, O>(&self, name: &str) -> Result<&DynRule<I, O>, RuleError>
    where
        I: ?Sized + 'static,
        O: 'static,
    {
        let entry = self
            .rules
            .get(name)
            .ok_or_else(|| RuleError::RuleNotFound(name.to_string()))?;

        let requested = RuleSignature::of::<I, O>();
        let mismatch = || RuleError::RuleTypeMismatch {
            name: name.to_string(),
            declared: entry.signature.to_string(),
            requested: requested.to_string(),
        };

        if entry.signature != requested {
            return Err(mismatch());
        }

        entry.rule.downcast_ref::<DynRule<I, O>>().ok_or_else(mismatch)
    }

    /// Declared signature of a registered rule
    pub fn signature(&self, name: &str) -> Option<RuleSignature> {
        self.rules.get(name).map(|entry| entry.signature)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered rule names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for RulesManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.rules
                    .iter()
                    .map(|(name, entry)| (name, entry.signature.to_string())),
            )
            .finish()
    }
}
