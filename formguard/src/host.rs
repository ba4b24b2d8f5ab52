//! Interfaces to the host that renders the form.

use std::collections::HashMap;

/// Read access to the form as the user currently sees it.
pub trait FormView {
    /// Current value of a field, or `None` if the form has no such field.
    fn value(&self, field: &str) -> Option<String>;

    /// Whether the form renders an exclusive group with this name.
    fn has_group(&self, group: &str) -> bool;

    /// Currently selected option of a group, if any.
    fn selection(&self, group: &str) -> Option<String>;
}

/// Where validation output goes.
///
/// Implementations should ignore targets they do not render, so that a
/// partial form (or none at all) can be validated headless.
pub trait FormDisplay {
    /// Show `message` in a display slot. An empty message clears it.
    fn publish_field_error(&mut self, slot: &str, message: &str);

    /// Styling hook for a field after each evaluation.
    fn publish_validity_class(&mut self, field: &str, is_valid: bool, has_value: bool);

    /// Whether the whole form is currently valid (enables submission).
    fn publish_aggregate_gate(&mut self, all_valid: bool);

    /// Replace the displayed value with its normalized form.
    fn publish_value(&mut self, _field: &str, _value: &str) {}

    /// Remove any validity styling from a field.
    fn clear_validity_class(&mut self, _field: &str) {}

    /// Direct the user's attention to a field or group.
    fn reveal(&mut self, _target: &str) {}
}

/// Anything that is both a view and a display.
pub trait FormHost: FormView + FormDisplay {}

impl<T: FormView + FormDisplay> FormHost for T {}

/// Styling state of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidityClass {
    /// No error and a value present.
    Valid,
    /// The field has an error.
    Invalid,
    /// No error, but nothing entered either.
    Neutral,
}

impl ValidityClass {
    pub fn from_flags(is_valid: bool, has_value: bool) -> Self {
        match (is_valid, has_value) {
            (false, _) => ValidityClass::Invalid,
            (true, true) => ValidityClass::Valid,
            (true, false) => ValidityClass::Neutral,
        }
    }
}

/// In-memory host for headless validation and tests.
///
/// Stores field values and group selections, and records everything the
/// engine publishes.
///
/// # Example
///
/// ```
/// use formguard::{FormView, MemoryHost};
///
/// let host = MemoryHost::new()
///     .with_field("email", "jane@example.com")
///     .with_group("gender", None);
///
/// assert_eq!(host.value("email").as_deref(), Some("jane@example.com"));
/// assert!(host.has_group("gender"));
/// assert_eq!(host.selection("gender"), None);
/// assert_eq!(host.value("phone"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    values: HashMap<String, String>,
    groups: HashMap<String, Option<String>>,
    errors: HashMap<String, String>,
    classes: HashMap<String, ValidityClass>,
    gate: Option<bool>,
    gate_updates: usize,
    revealed: Option<String>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field with an initial value.
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    /// Add a group with an optional initial selection.
    pub fn with_group(mut self, group: impl Into<String>, selection: Option<&str>) -> Self {
        self.groups
            .insert(group.into(), selection.map(str::to_string));
        self
    }

    /// Change a field's value, as if the user typed it.
    pub fn set_value(&mut self, field: &str, value: impl Into<String>) {
        if let Some(current) = self.values.get_mut(field) {
            *current = value.into();
        }
    }

    /// Select an option in a group.
    pub fn select(&mut self, group: &str, option: impl Into<String>) {
        if let Some(current) = self.groups.get_mut(group) {
            *current = Some(option.into());
        }
    }

    /// Clear a group's selection.
    pub fn deselect(&mut self, group: &str) {
        if let Some(current) = self.groups.get_mut(group) {
            *current = None;
        }
    }

    /// Empty every field and selection, like a form reset.
    pub fn clear_inputs(&mut self) {
        self.values.values_mut().for_each(String::clear);
        self.groups.values_mut().for_each(|selection| *selection = None);
    }

    /// Message currently shown in a slot. Empty slots read as `None`.
    pub fn error(&self, slot: &str) -> Option<&str> {
        self.errors
            .get(slot)
            .map(String::as_str)
            .filter(|message| !message.is_empty())
    }

    /// All non-empty slot messages.
    pub fn errors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .filter(|(_, message)| !message.is_empty())
            .map(|(slot, message)| (slot.as_str(), message.as_str()))
    }

    pub fn validity_class(&self, field: &str) -> Option<ValidityClass> {
        self.classes.get(field).copied()
    }

    /// The last published gate, if any.
    pub fn gate(&self) -> Option<bool> {
        self.gate
    }

    /// How many times the gate was published.
    pub fn gate_updates(&self) -> usize {
        self.gate_updates
    }

    /// The last field or group the engine pointed the user to.
    pub fn revealed(&self) -> Option<&str> {
        self.revealed.as_deref()
    }
}

impl FormView for MemoryHost {
    fn value(&self, field: &str) -> Option<String> {
        self.values.get(field).cloned()
    }

    fn has_group(&self, group: &str) -> bool {
        self.groups.contains_key(group)
    }

    fn selection(&self, group: &str) -> Option<String> {
        self.groups.get(group).cloned().flatten()
    }
}

impl FormDisplay for MemoryHost {
    fn publish_field_error(&mut self, slot: &str, message: &str) {
        self.errors.insert(slot.to_string(), message.to_string());
    }

    fn publish_validity_class(&mut self, field: &str, is_valid: bool, has_value: bool) {
        self.classes
            .insert(field.to_string(), ValidityClass::from_flags(is_valid, has_value));
    }

    fn publish_aggregate_gate(&mut self, all_valid: bool) {
        self.gate = Some(all_valid);
        self.gate_updates += 1;
    }

    fn publish_value(&mut self, field: &str, value: &str) {
        self.set_value(field, value);
    }

    fn clear_validity_class(&mut self, field: &str) {
        self.classes.remove(field);
    }

    fn reveal(&mut self, target: &str) {
        self.revealed = Some(target.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_value_ignores_unknown_fields() {
        let mut host = MemoryHost::new().with_field("name", "");
        host.set_value("name", "Jane");
        host.set_value("nickname", "JJ");
        assert_eq!(host.value("name").as_deref(), Some("Jane"));
        assert_eq!(host.value("nickname"), None);
    }

    #[test]
    fn test_clear_inputs_keeps_fields_present() {
        let mut host = MemoryHost::new()
            .with_field("name", "Jane")
            .with_group("gender", Some("female"));
        host.clear_inputs();
        assert_eq!(host.value("name").as_deref(), Some(""));
        assert!(host.has_group("gender"));
        assert_eq!(host.selection("gender"), None);
    }

    #[test]
    fn test_empty_error_clears_slot() {
        let mut host = MemoryHost::new();
        host.publish_field_error("name-error", "Name is required.");
        assert_eq!(host.error("name-error"), Some("Name is required."));
        host.publish_field_error("name-error", "");
        assert_eq!(host.error("name-error"), None);
        assert_eq!(host.errors().count(), 0);
    }

    #[test]
    fn test_validity_class_flags() {
        assert_eq!(ValidityClass::from_flags(false, true), ValidityClass::Invalid);
        assert_eq!(ValidityClass::from_flags(false, false), ValidityClass::Invalid);
        assert_eq!(ValidityClass::from_flags(true, true), ValidityClass::Valid);
        assert_eq!(ValidityClass::from_flags(true, false), ValidityClass::Neutral);
    }
}
