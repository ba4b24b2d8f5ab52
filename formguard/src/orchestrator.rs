//! Event handling, cascades and submit gating.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::error::FormError;
use crate::evaluate::{EvaluationResult, FieldEvaluator};
use crate::group::{ExclusiveGroupEvaluator, GroupReport};
use crate::host::{FormHost, FormView};
use crate::rule::FieldEvent;
use crate::rules::{FieldEntry, Member, RuleSet};
use crate::state::ValidationState;

/// Result of validating the whole form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Verdict {
    /// Whether every field and group is valid.
    pub valid: bool,
    /// First field or group, in declaration order, that has an error.
    pub first_error: Option<String>,
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Drives validation of one form.
///
/// Owns the [`ValidationState`] and the host. Every entry point runs to
/// completion synchronously: evaluation, display updates, cascades to
/// dependent fields and finally the aggregate gate.
///
/// Fields and groups declared in the rule set but missing from the host are
/// never tracked and are skipped silently.
pub struct Orchestrator<H> {
    rules: Arc<RuleSet>,
    host: H,
    state: ValidationState,
}

impl<H: FormHost> Orchestrator<H> {
    /// Attach a rule set to a host.
    ///
    /// Required fields start invalid, optional fields valid. Groups start
    /// invalid and are then checked against the host's current selections
    /// without displaying messages.
    pub fn new(rules: Arc<RuleSet>, host: H) -> Self {
        let mut orchestrator = Self {
            rules,
            host,
            state: ValidationState::new(),
        };
        orchestrator.initialize();
        orchestrator
    }

    fn initialize(&mut self) {
        self.state.clear();

        for entry in self.rules.fields() {
            if self.host.value(entry.id()).is_some() {
                self.state.track(entry.id(), !entry.rule().is_required());
            } else {
                log::debug!("[init] field `{}` is not on the form", entry.id());
            }
        }
        for group in self.rules.groups() {
            if self.host.has_group(group.name()) {
                self.state.track(group.name(), false);
            } else {
                log::debug!("[init] group `{}` is not on the form", group.name());
            }
        }

        self.evaluate_groups(false);
        self.publish_gate();
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn state(&self) -> &ValidationState {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutable access to the host, e.g. to change selections in tests.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn all_valid(&self) -> bool {
        self.state.all_valid()
    }

    /// Evaluate a value without touching state or display.
    pub fn evaluate(&self, field_id: &str, raw: &str) -> Result<EvaluationResult, FormError> {
        FieldEvaluator::new(&self.rules).evaluate(field_id, raw, &self.host)
    }

    /// Current message for a display slot, without publishing it.
    pub fn slot_error(&self, slot: &str) -> String {
        FieldEvaluator::new(&self.rules).resolve_slot_error(slot, &self.host)
    }

    /// Handle a new raw value for a field.
    ///
    /// Updates the field's validity, writes the normalized value back to the
    /// host, refreshes the field's display slot, re-validates every field whose
    /// check reads this one and publishes the aggregate gate.
    pub fn on_field_changed(&mut self, field_id: &str, raw: &str) -> Result<(), FormError> {
        let rules = Arc::clone(&self.rules);
        let entry = rules
            .field(field_id)
            .ok_or_else(|| FormError::UnknownField(field_id.to_string()))?;

        self.apply(&rules, entry, raw, &mut HashMap::new());
        self.publish_gate();
        Ok(())
    }

    /// Route a host event for a field.
    ///
    /// Blur always validates; input and change events only validate fields
    /// declared for that event kind. Returns whether the field was evaluated.
    pub fn handle_event(&mut self, field_id: &str, event: FieldEvent) -> Result<bool, FormError> {
        let entry = self
            .rules
            .field(field_id)
            .ok_or_else(|| FormError::UnknownField(field_id.to_string()))?;

        if !entry.rule().event().accepts(event) {
            log::trace!("[event] {:?} ignored for `{}`", event, field_id);
            return Ok(false);
        }
        let Some(raw) = self.host.value(field_id) else {
            return Ok(false);
        };

        self.on_field_changed(field_id, &raw)?;
        Ok(true)
    }

    /// Handle a selection change in an exclusive group.
    ///
    /// All groups are re-checked and the combined message is displayed.
    pub fn on_group_changed(&mut self, group: &str) -> Result<(), FormError> {
        if self.rules.group(group).is_none() {
            return Err(FormError::UnknownGroup(group.to_string()));
        }
        self.validate_groups(true);
        Ok(())
    }

    /// Check every group, optionally displaying the combined message, and
    /// publish the gate.
    pub fn validate_groups(&mut self, show: bool) -> GroupReport {
        let report = self.evaluate_groups(show);
        self.publish_gate();
        report
    }

    /// Validate every field and group with display, as before submission.
    ///
    /// When something is invalid the first offender in declaration order is
    /// revealed to the user.
    pub fn validate_all(&mut self) -> Verdict {
        let rules = Arc::clone(&self.rules);
        let mut pending = HashMap::new();
        for entry in rules.fields() {
            if let Some(raw) = self.host.value(entry.id()) {
                self.apply(&rules, entry, &raw, &mut pending);
            }
        }
        let report = self.evaluate_groups(true);
        self.publish_gate();

        let valid = self.state.all_valid();
        let first_error = if valid {
            None
        } else {
            self.first_error(&report, &pending)
        };

        if let Some(target) = &first_error {
            log::debug!("[submit] blocked, first error at `{}`", target);
            self.host.reveal(target);
        }

        Verdict { valid, first_error }
    }

    /// Clear all messages and styling and restore initial validity.
    ///
    /// The host is expected to have reset its own inputs already.
    pub fn reset(&mut self) {
        for entry in self.rules.fields() {
            self.host.clear_validity_class(entry.id());
            if let Some(slot) = entry.rule().slot_name() {
                self.host.publish_field_error(slot, "");
            }
        }
        if let Some(slot) = self.rules.group_slot() {
            self.host.publish_field_error(slot, "");
        }

        self.state.reset();
        self.evaluate_groups(false);
        self.publish_gate();
    }

    /// Evaluate one field and cascade to its dependents.
    ///
    /// `pending` collects the normalized values produced during this pass.
    /// Slot and dependent lookups read those before the host, so they never
    /// see a value the host has not written back yet.
    fn apply(
        &mut self,
        rules: &RuleSet,
        entry: &FieldEntry,
        raw: &str,
        pending: &mut HashMap<String, String>,
    ) {
        if !self.state.contains(entry.id()) {
            log::debug!("[validate] `{}` is not on the form, skipping", entry.id());
            return;
        }

        let evaluator = FieldEvaluator::new(rules);
        let result = evaluator.evaluate_entry(entry, raw, &Pending::new(&self.host, pending));
        pending.insert(entry.id().to_string(), result.formatted_value.clone());
        self.state.set(entry.id(), result.is_valid());

        self.host.publish_value(entry.id(), &result.formatted_value);
        self.host
            .publish_validity_class(entry.id(), result.is_valid(), result.has_value());

        if let Some(slot) = entry.rule().slot_name() {
            let message = evaluator.resolve_slot_error(slot, &Pending::new(&self.host, pending));
            self.host.publish_field_error(slot, &message);
        }

        for dependent in rules.dependents(entry.id()) {
            let Some(dependent) = rules.field(dependent) else {
                continue;
            };
            let Some(raw) = Pending::new(&self.host, pending).value(dependent.id()) else {
                continue;
            };
            log::debug!("[cascade] {} -> {}", entry.id(), dependent.id());
            self.apply(rules, dependent, &raw, pending);
        }
    }

    fn evaluate_groups(&mut self, show: bool) -> GroupReport {
        let report = ExclusiveGroupEvaluator::evaluate(self.rules.groups(), &self.host);
        for (name, valid) in &report.per_group_valid {
            self.state.set(name, *valid);
        }
        if show {
            if let Some(slot) = self.rules.group_slot() {
                self.host.publish_field_error(slot, &report.combined_message);
            }
        }
        report
    }

    fn first_error(
        &self,
        report: &GroupReport,
        pending: &HashMap<String, String>,
    ) -> Option<String> {
        let evaluator = FieldEvaluator::new(&self.rules);
        let view = Pending::new(&self.host, pending);
        self.rules.members().find_map(|member| match member {
            Member::Field(entry) => evaluator
                .current_error(entry, &view)
                .map(|_| entry.id().to_string()),
            Member::Group(group) => (report.is_valid(group.name()) == Some(false))
                .then(|| group.name().to_string()),
        })
    }

    fn publish_gate(&mut self) {
        let all_valid = self.state.all_valid();
        log::trace!("[gate] all valid: {}", all_valid);
        self.host.publish_aggregate_gate(all_valid);
    }
}

/// Host values overlaid with the values normalized during one pass.
struct Pending<'a, H> {
    host: &'a H,
    values: &'a HashMap<String, String>,
}

impl<'a, H> Pending<'a, H> {
    fn new(host: &'a H, values: &'a HashMap<String, String>) -> Self {
        Self { host, values }
    }
}

impl<H: FormView> FormView for Pending<'_, H> {
    fn value(&self, field: &str) -> Option<String> {
        match self.values.get(field) {
            Some(value) => Some(value.clone()),
            None => self.host.value(field),
        }
    }

    fn has_group(&self, group: &str) -> bool {
        self.host.has_group(group)
    }

    fn selection(&self, group: &str) -> Option<String> {
        self.host.selection(group)
    }
}
