//! Declarative rule tables.
//!
//! A [`FormSpec`] is the serializable shape of a [`RuleSet`]. Formatters and
//! custom checks cannot be expressed as data, so fields refer to them by name
//! and a [`Registry`] supplies the implementations.
//!
//! ```json
//! {
//!   "fields": [
//!     {
//!       "id": "phone",
//!       "required": true,
//!       "pattern": "^[0-9]{3}-[0-9]{3}-[0-9]{4}$",
//!       "formatter": "phone",
//!       "slot": "phone-error",
//!       "messages": {
//!         "required": "Phone number is required.",
//!         "pattern": "Phone must be in XXX-XXX-XXXX format."
//!       }
//!     }
//!   ],
//!   "groupSlot": "radio-error",
//!   "groups": [{ "name": "gender" }]
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::group::ExclusiveGroup;
use crate::normalize::DigitGroups;
use crate::rule::{Check, EventKind, Formatter, Rule, RuleKind, Siblings};
use crate::rules::RuleSet;

/// One field of a declarative rule table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub id: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub lowercase: bool,
    /// Name of a formatter in the registry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,
    /// Name of a custom check in the registry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    /// Messages keyed by rule kind (`required`, `pattern`, `minLength`, `maxLength`).
    #[serde(default)]
    pub messages: BTreeMap<String, String>,
    #[serde(default, alias = "groupKey", skip_serializing_if = "Option::is_none")]
    pub slot: Option<String>,
    #[serde(default)]
    pub event: EventKind,
}

/// A declarative rule table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSpec {
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub groups: Vec<ExclusiveGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_slot: Option<String>,
}

impl FormSpec {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolve names against `registry` and build the rule set.
    ///
    /// Groups are declared after all fields.
    pub fn into_rules(self, registry: &Registry) -> Result<RuleSet, ConfigError> {
        let mut builder = RuleSet::builder();
        for field in self.fields {
            let (id, rule) = field.into_rule(registry)?;
            builder = builder.field(id, rule);
        }
        if let Some(slot) = self.group_slot {
            builder = builder.group_slot(slot);
        }
        for group in self.groups {
            builder = builder.group(group);
        }
        builder.build()
    }
}

impl FieldSpec {
    fn into_rule(self, registry: &Registry) -> Result<(String, Rule), ConfigError> {
        let mut messages = HashMap::with_capacity(self.messages.len());
        for (kind, message) in self.messages {
            let kind = kind
                .parse::<RuleKind>()
                .map_err(|kind| ConfigError::UnknownMessageKind {
                    field: self.id.clone(),
                    kind,
                })?;
            messages.insert(kind, message);
        }

        let formatter = match self.formatter {
            Some(name) => Some(registry.formatters.get(&name).cloned().ok_or_else(|| {
                ConfigError::UnknownFormatter {
                    field: self.id.clone(),
                    name,
                }
            })?),
            None => None,
        };
        let check = match self.check {
            Some(name) => Some(registry.checks.get(&name).cloned().ok_or_else(|| {
                ConfigError::UnknownCheck {
                    field: self.id.clone(),
                    name,
                }
            })?),
            None => None,
        };

        let rule = Rule {
            required: self.required,
            pattern: self.pattern,
            min_length: self.min_length,
            max_length: self.max_length,
            lowercase: self.lowercase,
            formatter,
            check,
            depends_on: self.depends_on,
            messages,
            slot: self.slot,
            event: self.event,
        };
        Ok((self.id, rule))
    }
}

/// Named formatters and checks for declarative tables.
///
/// # Example
///
/// ```
/// use formguard::{FormSpec, Registry};
///
/// let registry = Registry::with_builtins().check("no_quotes", |value, _| {
///     value.contains('"').then(|| "Double quotes are not allowed.".to_string())
/// });
///
/// let spec = FormSpec::from_json(
///     r#"{ "fields": [{ "id": "notes", "check": "no_quotes", "event": "change" }] }"#,
/// )
/// .unwrap();
/// let rules = spec.into_rules(&registry).unwrap();
/// assert!(rules.field("notes").unwrap().rule().has_check());
/// ```
#[derive(Clone, Default)]
pub struct Registry {
    formatters: HashMap<String, Formatter>,
    checks: HashMap<String, Check>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the `phone` and `ssn` digit formatters.
    pub fn with_builtins() -> Self {
        Self::new()
            .formatter_fn("phone", DigitGroups::phone().into_formatter())
            .formatter_fn("ssn", DigitGroups::ssn().into_formatter())
    }

    /// Register a formatter.
    pub fn formatter<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.formatter_fn(name, Arc::new(f))
    }

    /// Register an already shared formatter.
    pub fn formatter_fn(mut self, name: impl Into<String>, f: Formatter) -> Self {
        self.formatters.insert(name.into(), f);
        self
    }

    /// Register a custom check.
    pub fn check<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str, &Siblings) -> Option<String> + Send + Sync + 'static,
    {
        self.checks.insert(name.into(), Arc::new(f));
        self
    }

    pub fn has_formatter(&self, name: &str) -> bool {
        self.formatters.contains_key(name)
    }

    pub fn has_check(&self, name: &str) -> bool {
        self.checks.contains_key(name)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut formatters: Vec<&str> = self.formatters.keys().map(String::as_str).collect();
        let mut checks: Vec<&str> = self.checks.keys().map(String::as_str).collect();
        formatters.sort_unstable();
        checks.sort_unstable();
        f.debug_struct("Registry")
            .field("formatters", &formatters)
            .field("checks", &checks)
            .finish()
    }
}
