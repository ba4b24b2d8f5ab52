//! Per-field validation rules.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Reformats a (possibly case-folded) value, e.g. inserting separators.
///
/// Must be idempotent: it runs on every keystroke against its own output.
pub type Formatter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Custom check run after the built-in rules pass.
///
/// Receives the trimmed value and the current values of the fields the rule
/// declared with [`Rule::check_with`]. Returns an error message, or `None`.
pub type Check = Arc<dyn Fn(&str, &Siblings) -> Option<String> + Send + Sync>;

/// The built-in rule kinds that carry a display message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    Required,
    Pattern,
    MinLength,
    MaxLength,
}

impl RuleKind {
    pub const ALL: [RuleKind; 4] = [
        RuleKind::Required,
        RuleKind::Pattern,
        RuleKind::MinLength,
        RuleKind::MaxLength,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Required => "required",
            RuleKind::Pattern => "pattern",
            RuleKind::MinLength => "minLength",
            RuleKind::MaxLength => "maxLength",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Which host event triggers validation of a field (besides blur).
///
/// Free-text inputs validate on every keystroke; selects and text areas
/// validate when their value is committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    #[default]
    Input,
    Change,
}

impl EventKind {
    /// Whether an event of this kind should trigger evaluation.
    pub fn accepts(self, event: FieldEvent) -> bool {
        match event {
            FieldEvent::Blur => true,
            FieldEvent::Input => self == EventKind::Input,
            FieldEvent::Change => self == EventKind::Change,
        }
    }
}

/// An event reported by the host for a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEvent {
    Input,
    Change,
    Blur,
}

/// Current values of the fields a custom check depends on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Siblings {
    values: HashMap<String, String>,
}

impl Siblings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sibling value.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    pub(crate) fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }

    /// Value of a sibling field. Undeclared or absent fields read as empty.
    pub fn get(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or_default()
    }
}

/// Validation rule for one field.
///
/// Every rule kind declared through the builder comes with its message. Rules
/// assembled from a declarative table are checked for missing messages when
/// the [`RuleSet`](crate::RuleSet) is built.
///
/// # Example
///
/// ```
/// use formguard::{EventKind, Rule};
///
/// let rule = Rule::new()
///     .required("Zip code is required.")
///     .pattern(r"^\d{5}(-\d{4})?$", "Zip code must be in 12345 or 12345-6789 format.")
///     .slot("address-error");
///
/// assert!(rule.is_required());
/// assert_eq!(rule.event(), EventKind::Input);
/// ```
#[derive(Clone, Default)]
pub struct Rule {
    pub(crate) required: bool,
    pub(crate) pattern: Option<String>,
    pub(crate) min_length: Option<usize>,
    pub(crate) max_length: Option<usize>,
    pub(crate) lowercase: bool,
    pub(crate) formatter: Option<Formatter>,
    pub(crate) check: Option<Check>,
    pub(crate) depends_on: Vec<String>,
    pub(crate) messages: HashMap<RuleKind, String>,
    pub(crate) slot: Option<String>,
    pub(crate) event: EventKind,
}

impl Rule {
    /// Create an optional rule with no checks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a non-blank value.
    pub fn required(mut self, msg: impl Into<String>) -> Self {
        self.required = true;
        self.message(RuleKind::Required, msg)
    }

    /// Require the trimmed value to match a regex.
    ///
    /// The pattern is compiled when the rule set is built.
    pub fn pattern(mut self, pattern: impl Into<String>, msg: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self.message(RuleKind::Pattern, msg)
    }

    /// Require a minimum length (in characters).
    pub fn min_length(mut self, min: usize, msg: impl Into<String>) -> Self {
        self.min_length = Some(min);
        self.message(RuleKind::MinLength, msg)
    }

    /// Require a maximum length (in characters).
    pub fn max_length(mut self, max: usize, msg: impl Into<String>) -> Self {
        self.max_length = Some(max);
        self.message(RuleKind::MaxLength, msg)
    }

    /// Bound the length on both sides with a single message.
    pub fn length(self, min: usize, max: usize, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        self.min_length(min, msg.clone()).max_length(max, msg)
    }

    /// Lowercase the value before formatting and checking.
    pub fn lowercase(mut self) -> Self {
        self.lowercase = true;
        self
    }

    /// Reformat the value before checking.
    pub fn formatter<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.formatter = Some(Arc::new(f));
        self
    }

    /// Add a custom check that only looks at this field's value.
    ///
    /// Replaces any earlier check along with its dependencies.
    pub fn check<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.depends_on.clear();
        self.check = Some(Arc::new(move |value, _| f(value)));
        self
    }

    /// Add a custom check that reads other fields.
    ///
    /// Every field named here becomes a cascade source: when it changes, this
    /// field is re-validated.
    pub fn check_with<I, S, F>(mut self, depends_on: I, f: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&str, &Siblings) -> Option<String> + Send + Sync + 'static,
    {
        self.depends_on = depends_on.into_iter().map(Into::into).collect();
        self.check = Some(Arc::new(f));
        self
    }

    /// Set the message for a rule kind.
    pub fn message(mut self, kind: RuleKind, msg: impl Into<String>) -> Self {
        self.messages.insert(kind, msg.into());
        self
    }

    /// Publish errors for this field to a (possibly shared) display slot.
    pub fn slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = Some(slot.into());
        self
    }

    /// Set which host event triggers validation.
    pub fn on(mut self, event: EventKind) -> Self {
        self.event = event;
        self
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_lowercase(&self) -> bool {
        self.lowercase
    }

    pub fn pattern_source(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    pub fn min(&self) -> Option<usize> {
        self.min_length
    }

    pub fn max(&self) -> Option<usize> {
        self.max_length
    }

    pub fn has_formatter(&self) -> bool {
        self.formatter.is_some()
    }

    pub fn has_check(&self) -> bool {
        self.check.is_some()
    }

    pub fn depends_on(&self) -> &[String] {
        &self.depends_on
    }

    pub fn slot_name(&self) -> Option<&str> {
        self.slot.as_deref()
    }

    pub fn event(&self) -> EventKind {
        self.event
    }

    /// Message for a rule kind, if one was given.
    pub fn message_for(&self, kind: RuleKind) -> Option<&str> {
        self.messages.get(&kind).map(String::as_str)
    }

    /// The rule kinds this rule actually applies.
    pub fn declared_kinds(&self) -> Vec<RuleKind> {
        let mut kinds = Vec::new();
        if self.required {
            kinds.push(RuleKind::Required);
        }
        if self.pattern.is_some() {
            kinds.push(RuleKind::Pattern);
        }
        if self.min_length.is_some() {
            kinds.push(RuleKind::MinLength);
        }
        if self.max_length.is_some() {
            kinds.push(RuleKind::MaxLength);
        }
        kinds
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("required", &self.required)
            .field("pattern", &self.pattern)
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("lowercase", &self.lowercase)
            .field("formatter", &self.formatter.is_some())
            .field("check", &self.check.is_some())
            .field("depends_on", &self.depends_on)
            .field("slot", &self.slot)
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}
