//! Tests for event handling, cascades and submit gating.

use std::collections::HashMap;
use std::sync::Arc;

use formguard::{
    EventKind, ExclusiveGroup, FieldEvent, FormDisplay, FormError, FormView, MemoryHost,
    Orchestrator, Rule, RuleSet, ValidityClass,
};

fn rules() -> Arc<RuleSet> {
    let rules = RuleSet::builder()
        .field(
            "fname",
            Rule::new()
                .required("First name is required.")
                .pattern("^[a-zA-Z'-]+$", "First name can only contain letters, apostrophes, and dashes.")
                .slot("name-error"),
        )
        .field(
            "lname",
            Rule::new()
                .required("Last name is required.")
                .pattern("^[a-zA-Z'-]+$", "Last name can only contain letters, apostrophes, and dashes.")
                .slot("name-error"),
        )
        .field(
            "address2",
            Rule::new()
                .length(2, 30, "Address Line 2 must be between 2 and 30 characters if provided.")
                .slot("address2-error"),
        )
        .field(
            "state",
            Rule::new()
                .required("State is required.")
                .on(EventKind::Change)
                .slot("address-error"),
        )
        .group_slot("radio-error")
        .group(ExclusiveGroup::new("gender"))
        .group(
            ExclusiveGroup::new("vaccinated")
                .with_message("COVID-19 vaccination status is required."),
        )
        .field(
            "pass1",
            Rule::new()
                .required("Password is required.")
                .min_length(8, "Password must be between 8 and 30 characters.")
                .slot("pass1-error"),
        )
        .field(
            "pass2",
            Rule::new()
                .required("Password confirmation is required.")
                .check_with(["pass1"], |value, siblings| {
                    (value != siblings.get("pass1")).then(|| "Passwords do not match.".to_string())
                })
                .slot("pass2-error"),
        )
        .build()
        .unwrap();
    Arc::new(rules)
}

fn host() -> MemoryHost {
    MemoryHost::new()
        .with_field("fname", "")
        .with_field("lname", "")
        .with_field("address2", "")
        .with_field("state", "")
        .with_field("pass1", "")
        .with_field("pass2", "")
        .with_group("gender", None)
        .with_group("vaccinated", None)
}

fn filled() -> Orchestrator<MemoryHost> {
    let mut form = Orchestrator::new(rules(), host());
    form.on_field_changed("fname", "Jane").unwrap();
    form.on_field_changed("lname", "Doe").unwrap();
    form.on_field_changed("state", "TX").unwrap();
    form.on_field_changed("pass1", "Secret123!").unwrap();
    form.on_field_changed("pass2", "Secret123!").unwrap();
    form.host_mut().select("gender", "female");
    form.on_group_changed("gender").unwrap();
    form.host_mut().select("vaccinated", "yes");
    form.on_group_changed("vaccinated").unwrap();
    form
}

// ============================================================================
// Initialization
// ============================================================================

#[test]
fn test_initial_state_follows_requiredness() {
    let form = Orchestrator::new(rules(), host());
    let state = form.state();

    assert_eq!(state.get("fname"), Some(false));
    assert_eq!(state.get("address2"), Some(true));
    assert_eq!(state.get("gender"), Some(false));
    assert_eq!(state.len(), 8);
    assert!(!form.all_valid());
    assert_eq!(form.host().gate(), Some(false));
    // Initial group check does not display anything.
    assert_eq!(form.host().error("radio-error"), None);
}

#[test]
fn test_preselected_group_starts_valid() {
    let host = host().with_group("gender", Some("male"));
    let form = Orchestrator::new(rules(), host);
    assert_eq!(form.state().get("gender"), Some(true));
    assert_eq!(form.state().get("vaccinated"), Some(false));
}

#[test]
fn test_absent_fields_are_not_tracked() {
    let host = MemoryHost::new().with_field("fname", "");
    let mut form = Orchestrator::new(rules(), host);

    assert_eq!(form.state().len(), 1);
    assert!(!form.state().contains("gender"));

    // Changing an absent field is a no-op.
    form.on_field_changed("lname", "Doe").unwrap();
    assert!(!form.state().contains("lname"));

    form.on_field_changed("fname", "Jane").unwrap();
    assert!(form.all_valid());
}

// ============================================================================
// Field changes
// ============================================================================

#[test]
fn test_field_change_updates_state_display_and_gate() {
    let mut form = Orchestrator::new(rules(), host());

    form.on_field_changed("fname", "J4ne").unwrap();
    assert_eq!(form.state().get("fname"), Some(false));
    assert_eq!(
        form.host().error("name-error"),
        Some("First name can only contain letters, apostrophes, and dashes.")
    );
    assert_eq!(form.host().validity_class("fname"), Some(ValidityClass::Invalid));

    form.on_field_changed("fname", "Jane").unwrap();
    assert_eq!(form.state().get("fname"), Some(true));
    assert_eq!(form.host().validity_class("fname"), Some(ValidityClass::Valid));
    // lname is still empty and shares the slot.
    assert_eq!(form.host().error("name-error"), Some("Last name is required."));
}

#[test]
fn test_shared_slot_clears_when_all_siblings_valid() {
    let mut form = Orchestrator::new(rules(), host());
    form.on_field_changed("lname", "D0e").unwrap();
    form.on_field_changed("fname", "Jane").unwrap();
    assert_eq!(
        form.host().error("name-error"),
        Some("Last name can only contain letters, apostrophes, and dashes.")
    );

    form.on_field_changed("lname", "Doe").unwrap();
    assert_eq!(form.host().error("name-error"), None);
}

#[test]
fn test_optional_field_cleared_is_neutral() {
    let mut form = Orchestrator::new(rules(), host());
    form.on_field_changed("address2", "A").unwrap();
    assert_eq!(form.state().get("address2"), Some(false));

    form.on_field_changed("address2", "").unwrap();
    assert_eq!(form.state().get("address2"), Some(true));
    assert_eq!(form.host().validity_class("address2"), Some(ValidityClass::Neutral));
    assert_eq!(form.host().error("address2-error"), None);
}

#[test]
fn test_normalized_value_is_written_back() {
    let rules = RuleSet::builder()
        .field("email", Rule::new().lowercase())
        .build()
        .unwrap();
    let mut form = Orchestrator::new(Arc::new(rules), MemoryHost::new().with_field("email", ""));

    form.on_field_changed("email", "Jane@Example.COM").unwrap();
    assert_eq!(form.host().value("email").as_deref(), Some("jane@example.com"));
}

#[test]
fn test_unknown_field_is_rejected() {
    let mut form = Orchestrator::new(rules(), host());
    assert_eq!(
        form.on_field_changed("nickname", "JJ"),
        Err(FormError::UnknownField("nickname".to_string()))
    );
    assert_eq!(
        form.on_group_changed("insurance"),
        Err(FormError::UnknownGroup("insurance".to_string()))
    );
}

// ============================================================================
// Cascades
// ============================================================================

#[test]
fn test_primary_change_revalidates_confirmation() {
    let mut form = Orchestrator::new(rules(), host());
    form.on_field_changed("pass2", "Secret123!").unwrap();
    assert_eq!(form.state().get("pass2"), Some(false));
    assert_eq!(form.host().error("pass2-error"), Some("Passwords do not match."));

    // Matching the confirmation fixes it without touching pass2.
    form.on_field_changed("pass1", "Secret123!").unwrap();
    assert_eq!(form.state().get("pass2"), Some(true));
    assert_eq!(form.host().error("pass2-error"), None);

    // Diverging breaks it again.
    form.on_field_changed("pass1", "Secret1234!").unwrap();
    assert_eq!(form.state().get("pass2"), Some(false));
    assert_eq!(form.host().error("pass2-error"), Some("Passwords do not match."));
}

#[test]
fn test_cascade_completes_before_gate() {
    let mut form = filled();
    assert!(form.all_valid());
    assert_eq!(form.host().gate(), Some(true));

    form.on_field_changed("pass1", "Different1!").unwrap();
    assert_eq!(form.host().gate(), Some(false));

    form.on_field_changed("pass1", "Secret123!").unwrap();
    assert_eq!(form.host().gate(), Some(true));
}

#[test]
fn test_cascade_publishes_gate_once() {
    let mut form = Orchestrator::new(rules(), host());
    let before = form.host().gate_updates();
    form.on_field_changed("pass1", "Secret123!").unwrap();
    assert_eq!(form.host().gate_updates(), before + 1);
}

// ============================================================================
// Events
// ============================================================================

#[test]
fn test_events_respect_declared_kind() {
    let mut form = Orchestrator::new(rules(), host());
    form.host_mut().set_value("state", "TX");
    form.host_mut().set_value("fname", "Jane");

    assert!(!form.handle_event("state", FieldEvent::Input).unwrap());
    assert_eq!(form.state().get("state"), Some(false));

    assert!(form.handle_event("state", FieldEvent::Change).unwrap());
    assert_eq!(form.state().get("state"), Some(true));

    assert!(!form.handle_event("fname", FieldEvent::Change).unwrap());
    assert_eq!(form.state().get("fname"), Some(false));

    assert!(form.handle_event("fname", FieldEvent::Blur).unwrap());
    assert_eq!(form.state().get("fname"), Some(true));
}

// ============================================================================
// Groups
// ============================================================================

#[test]
fn test_group_change_shows_combined_message() {
    let mut form = Orchestrator::new(rules(), host());
    form.host_mut().select("gender", "other");
    form.on_group_changed("gender").unwrap();

    assert_eq!(form.state().get("gender"), Some(true));
    assert_eq!(form.state().get("vaccinated"), Some(false));
    assert_eq!(
        form.host().error("radio-error"),
        Some("COVID-19 vaccination status is required.")
    );
}

#[test]
fn test_validate_groups_without_display() {
    let mut form = Orchestrator::new(rules(), host());
    let report = form.validate_groups(false);
    assert_eq!(
        report.combined_message,
        "Gender selection is required. COVID-19 vaccination status is required."
    );
    assert_eq!(form.host().error("radio-error"), None);

    let report = form.validate_groups(true);
    assert_eq!(form.host().error("radio-error"), Some(report.combined_message.as_str()));
}

// ============================================================================
// Validate all / reset
// ============================================================================

#[test]
fn test_validate_all_reports_first_error_in_declaration_order() {
    let mut form = Orchestrator::new(rules(), host());
    form.on_field_changed("fname", "Jane").unwrap();
    form.on_field_changed("lname", "Doe").unwrap();
    form.on_field_changed("state", "TX").unwrap();

    let verdict = form.validate_all();
    assert!(!verdict.valid);
    // Groups are declared before the password fields.
    assert_eq!(verdict.first_error.as_deref(), Some("gender"));
    assert_eq!(form.host().revealed(), Some("gender"));
    assert_eq!(
        form.host().error("pass1-error"),
        Some("Password is required.")
    );
    assert_eq!(
        form.host().error("radio-error"),
        Some("Gender selection is required. COVID-19 vaccination status is required.")
    );
}

#[test]
fn test_validate_all_on_complete_form() {
    let mut form = filled();
    let verdict = form.validate_all();
    assert!(verdict.is_valid());
    assert_eq!(verdict.first_error, None);
    assert_eq!(form.host().revealed(), None);
    assert_eq!(form.host().errors().count(), 0);
}

#[test]
fn test_validate_all_evaluates_untouched_fields() {
    let mut form = filled();
    form.host_mut().set_value("fname", "J4ne");

    let verdict = form.validate_all();
    assert_eq!(verdict.first_error.as_deref(), Some("fname"));
    assert_eq!(form.state().get("fname"), Some(false));
}

#[test]
fn test_reset_restores_initial_state() {
    let mut form = filled();
    form.validate_all();
    form.on_field_changed("address2", "x").unwrap();

    form.host_mut().clear_inputs();
    form.reset();

    assert_eq!(form.state().get("fname"), Some(false));
    assert_eq!(form.state().get("address2"), Some(true));
    assert_eq!(form.state().get("gender"), Some(false));
    assert_eq!(form.host().errors().count(), 0);
    assert_eq!(form.host().validity_class("fname"), None);
    assert_eq!(form.host().gate(), Some(false));
}

#[test]
fn test_gate_flips_with_single_field() {
    let mut form = filled();
    assert_eq!(form.host().gate(), Some(true));

    for (field, bad, good) in [("fname", "", "Jane"), ("address2", "x", ""), ("state", "", "TX")] {
        form.on_field_changed(field, bad).unwrap();
        assert_eq!(form.host().gate(), Some(false), "{} broken", field);
        form.on_field_changed(field, good).unwrap();
        assert_eq!(form.host().gate(), Some(true), "{} fixed", field);
    }

    form.host_mut().deselect("gender");
    form.on_group_changed("gender").unwrap();
    assert_eq!(form.host().gate(), Some(false));
    form.host_mut().select("gender", "female");
    form.on_group_changed("gender").unwrap();
    assert_eq!(form.host().gate(), Some(true));
}

// ============================================================================
// Hosts that do not write values back
// ============================================================================

/// Implements only the required display methods, so values typed through the
/// orchestrator never reach `values`.
#[derive(Default)]
struct ReadOnlyHost {
    values: HashMap<String, String>,
    groups: HashMap<String, Option<String>>,
    errors: HashMap<String, String>,
}

impl ReadOnlyHost {
    fn with_field(mut self, field: &str, value: &str) -> Self {
        self.values.insert(field.to_string(), value.to_string());
        self
    }

    fn error(&self, slot: &str) -> Option<&str> {
        self.errors.get(slot).map(String::as_str)
    }
}

impl FormView for ReadOnlyHost {
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

impl FormDisplay for ReadOnlyHost {
    fn publish_field_error(&mut self, slot: &str, message: &str) {
        self.errors.insert(slot.to_string(), message.to_string());
    }

    fn publish_validity_class(&mut self, _field: &str, _is_valid: bool, _has_value: bool) {}

    fn publish_aggregate_gate(&mut self, _all_valid: bool) {}
}

#[test]
fn test_slot_uses_new_value_without_write_back() {
    let host = ReadOnlyHost::default()
        .with_field("fname", "Jane")
        .with_field("lname", "Doe");
    let mut form = Orchestrator::new(rules(), host);

    form.on_field_changed("fname", "").unwrap();
    assert_eq!(form.state().get("fname"), Some(false));
    assert_eq!(form.host().error("name-error"), Some("First name is required."));
    // The host still holds the old value.
    assert_eq!(form.host().value("fname").as_deref(), Some("Jane"));
}

#[test]
fn test_cascade_uses_new_value_without_write_back() {
    let host = ReadOnlyHost::default()
        .with_field("pass1", "Secret123!")
        .with_field("pass2", "Changed456!");
    let mut form = Orchestrator::new(rules(), host);

    form.on_field_changed("pass1", "Changed456!").unwrap();
    assert_eq!(form.state().get("pass2"), Some(true));
    assert_eq!(form.host().error("pass2-error"), Some(""));

    form.on_field_changed("pass1", "Other789!").unwrap();
    assert_eq!(form.state().get("pass2"), Some(false));
    assert_eq!(form.host().error("pass2-error"), Some("Passwords do not match."));
}
