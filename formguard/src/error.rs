//! Error types

use thiserror::Error;

use crate::rule::RuleKind;

/// A defect in a rule table, detected when the [`RuleSet`](crate::RuleSet) is built.
///
/// These are programming errors, not user input failures. Callers are expected
/// to abort initialization when they see one.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("field `{0}` is declared more than once")]
    DuplicateField(String),

    #[error("group `{0}` is declared more than once")]
    DuplicateGroup(String),

    #[error("field `{field}` declares a {kind} rule without a message")]
    MissingMessage { field: String, kind: RuleKind },

    #[error("field `{field}` has a message for unknown rule kind `{kind}`")]
    UnknownMessageKind { field: String, kind: String },

    #[error("field `{field}` depends on unknown field `{dependency}`")]
    UnknownDependency { field: String, dependency: String },

    #[error("dependency cycle: {}", .0.join(" -> "))]
    DependencyCycle(Vec<String>),

    #[error("field `{field}` has an invalid pattern: {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("field `{field}` references unknown formatter `{name}`")]
    UnknownFormatter { field: String, name: String },

    #[error("field `{field}` references unknown check `{name}`")]
    UnknownCheck { field: String, name: String },

    #[error("failed to parse rule table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Misuse of the orchestrator at runtime.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("unknown group `{0}`")]
    UnknownGroup(String),
}
