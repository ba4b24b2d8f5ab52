//! Exclusive (single-choice) groups such as radio buttons.

use serde::{Deserialize, Serialize};

use crate::host::FormView;

/// A group of mutually exclusive options. Always required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusiveGroup {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl ExclusiveGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            message: None,
        }
    }

    /// Human label used in the generic message.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Replace the generic message entirely.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The explicit label, or the name with its first letter upper-cased.
    pub fn label(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => capitalize(&self.name),
        }
    }

    /// Message shown when nothing in the group is selected.
    pub fn required_message(&self) -> String {
        match &self.message {
            Some(message) => message.clone(),
            None => format!("{} selection is required.", self.label()),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Outcome of checking a set of exclusive groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupReport {
    /// Validity per group, in the order the groups were given.
    pub per_group_valid: Vec<(String, bool)>,
    /// Space-joined messages of every group without a selection.
    pub combined_message: String,
}

impl GroupReport {
    pub fn all_valid(&self) -> bool {
        self.per_group_valid.iter().all(|(_, valid)| *valid)
    }

    pub fn is_valid(&self, group: &str) -> Option<bool> {
        self.per_group_valid
            .iter()
            .find(|(name, _)| name == group)
            .map(|(_, valid)| *valid)
    }
}

/// Checks exclusive groups. Groups have no text value, so they bypass the
/// field evaluator.
pub struct ExclusiveGroupEvaluator;

impl ExclusiveGroupEvaluator {
    /// Check every group the view knows about. A group is valid iff something
    /// is selected.
    pub fn evaluate(groups: &[ExclusiveGroup], view: &dyn FormView) -> GroupReport {
        let mut report = GroupReport::default();
        let mut messages = Vec::new();

        for group in groups {
            if !view.has_group(group.name()) {
                log::trace!("[groups] `{}` is not on the form", group.name());
                continue;
            }
            let valid = view.selection(group.name()).is_some();
            if !valid {
                messages.push(group.required_message());
            }
            report.per_group_valid.push((group.name().to_string(), valid));
        }

        report.combined_message = messages.join(" ");
        report
    }
}
