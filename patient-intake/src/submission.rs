//! JSON submissions for headless validation.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use formguard::{MemoryHost, RuleSet};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Default position of the health slider.
pub const DEFAULT_HEALTH_SCALE: u8 = 5;

/// Everything a user entered on the registration form.
///
/// ```json
/// {
///   "values": { "fname": "Jane", "phone": "7135550100" },
///   "groups": { "gender": "female" },
///   "conditions": ["Asthma"],
///   "healthScale": 7
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Raw text per field.
    #[serde(default)]
    pub values: BTreeMap<String, String>,
    /// Selected option per exclusive group. Unselected groups are omitted.
    #[serde(default)]
    pub groups: BTreeMap<String, String>,
    /// Checked medical conditions.
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default = "default_health_scale")]
    pub health_scale: u8,
}

fn default_health_scale() -> u8 {
    DEFAULT_HEALTH_SCALE
}

impl Default for Submission {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
            groups: BTreeMap::new(),
            conditions: Vec::new(),
            health_scale: DEFAULT_HEALTH_SCALE,
        }
    }
}

impl Submission {
    pub fn from_json(json: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, AppError> {
        let json = fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Set a field value.
    pub fn with_value(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    /// Select an option in a group.
    pub fn with_selection(mut self, group: impl Into<String>, option: impl Into<String>) -> Self {
        self.groups.insert(group.into(), option.into());
        self
    }

    /// Build a host holding every field and group the rules declare.
    ///
    /// Fields missing from the submission are present but empty, so they are
    /// validated like untouched inputs.
    pub fn to_host(&self, rules: &RuleSet) -> MemoryHost {
        let mut host = MemoryHost::new();
        for entry in rules.fields() {
            let value = self.values.get(entry.id()).cloned().unwrap_or_default();
            host = host.with_field(entry.id(), value);
        }
        for group in rules.groups() {
            let selection = self.groups.get(group.name()).map(String::as_str);
            host = host.with_group(group.name(), selection);
        }
        for id in self.undeclared(rules) {
            log::warn!("Ignoring undeclared entry `{}` in submission", id);
        }
        host
    }

    /// Entries naming fields or groups that `rules` does not declare.
    pub fn undeclared<'a>(&'a self, rules: &RuleSet) -> Vec<&'a str> {
        let fields = self
            .values
            .keys()
            .filter(|field| rules.field(field).is_none());
        let groups = self
            .groups
            .keys()
            .filter(|group| rules.group(group).is_none());
        fields.chain(groups).map(String::as_str).collect()
    }
}
