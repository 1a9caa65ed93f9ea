// SPDX-License-Identifier: MIT

//! Typed error handling for rulekit-rs
//!
//! Engine failures are reported through [`RuleError`]; everything that
//! touches the outside world (files, YAML, HTTP, email) funnels into
//! [`RulekitError`].

use thiserror::Error;

/// Top-level error type for rulekit-rs
#[derive(Debug, Error)]
pub enum RulekitError {
    /// Registration or evaluation failure inside the engine
    #[error("Rule error: {0}")]
    Rule(#[from] RuleError),

    /// Email delivery or template rendering failure
    #[error("Email error: {0}")]
    Email(#[from] EmailError),

    /// Raw input could not be converted to the rule's input type
    #[error("Invalid input for rule '{rule}': {message}")]
    InvalidInput { rule: String, message: String },

    /// Configuration errors (missing env vars, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors raised by the rules engine
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// A rule with this name is already registered
    #[error("Rule '{0}' already exists")]
    DuplicateRuleName(String),

    /// No rule is registered under this name
    #[error("Rule '{0}' not found")]
    RuleNotFound(String),

    /// Requested input/output types disagree with the rule's declared types
    #[error("Rule '{name}' is declared as {declared}, but was evaluated as {requested}")]
    RuleTypeMismatch {
        name: String,
        declared: String,
        requested: String,
    },

    /// A rule definition cannot produce a valid rule
    #[error("Invalid configuration for rule '{name}': {reason}")]
    InvalidRuleConfiguration { name: String, reason: String },
}

/// Email-specific errors
#[derive(Debug, Error)]
pub enum EmailError {
    /// No template registered under this id
    #[error("Unknown email template: {0}")]
    UnknownTemplate(usize),

    /// Positional template received the wrong number of values
    #[error("Template {template_id} requires {expected} values, but {provided} were provided")]
    PlaceholderCount {
        template_id: usize,
        expected: usize,
        provided: usize,
    },

    /// Named template still contains a placeholder after substitution
    #[error("Template {template_id} has unresolved placeholder '{placeholder}'")]
    UnresolvedPlaceholder {
        template_id: usize,
        placeholder: String,
    },

    /// Sender or recipient address is blank
    #[error("Missing {0} address")]
    MissingAddress(&'static str),

    /// The email service refused the message
    #[error("Email service rejected message ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Transport-level failure talking to the email service
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl RuleError {
    /// Create an invalid configuration error
    pub fn invalid_config(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRuleConfiguration {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl RulekitError {
    /// Create an invalid input error
    pub fn invalid_input(rule: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            rule: rule.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
