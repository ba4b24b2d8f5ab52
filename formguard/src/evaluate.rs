//! Evaluation of a single field against its rule.

use serde::Serialize;

use crate::error::FormError;
use crate::host::FormView;
use crate::normalize::normalize;
use crate::rule::{RuleKind, Siblings};
use crate::rules::{FieldEntry, RuleSet};

/// Outcome of evaluating one field value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvaluationResult {
    /// The value after case-folding and formatting.
    pub formatted_value: String,
    /// The first failing rule's message.
    pub error: Option<String>,
}

impl EvaluationResult {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Whether the formatted value is non-blank.
    pub fn has_value(&self) -> bool {
        !self.formatted_value.trim().is_empty()
    }
}

/// Runs field values through their rules.
///
/// Rules apply in a fixed order and the first failure wins: required, then
/// (for non-blank values only) minimum length, maximum length, pattern and
/// finally the custom check. A blank optional field is always valid.
#[derive(Debug, Clone, Copy)]
pub struct FieldEvaluator<'a> {
    rules: &'a RuleSet,
}

impl<'a> FieldEvaluator<'a> {
    pub fn new(rules: &'a RuleSet) -> Self {
        Self { rules }
    }

    /// Evaluate a raw value for a field.
    ///
    /// `view` supplies the current values of any fields the rule's custom
    /// check depends on.
    pub fn evaluate(
        &self,
        field_id: &str,
        raw: &str,
        view: &dyn FormView,
    ) -> Result<EvaluationResult, FormError> {
        let entry = self
            .rules
            .field(field_id)
            .ok_or_else(|| FormError::UnknownField(field_id.to_string()))?;
        Ok(self.evaluate_entry(entry, raw, view))
    }

    /// Error for a field's current value in the view, without publishing
    /// anything. Fields missing from the view have no error.
    pub fn error_for(&self, field_id: &str, view: &dyn FormView) -> Result<Option<String>, FormError> {
        let entry = self
            .rules
            .field(field_id)
            .ok_or_else(|| FormError::UnknownField(field_id.to_string()))?;
        Ok(self.current_error(entry, view))
    }

    /// First error among the fields sharing `slot`, in declaration order.
    ///
    /// Every sibling is re-evaluated from its current value, so the slot always
    /// reflects the whole group, not just the field that last changed. Returns
    /// an empty string when no sibling has an error.
    pub fn resolve_slot_error(&self, slot: &str, view: &dyn FormView) -> String {
        self.rules
            .slot_fields(slot)
            .find_map(|entry| self.current_error(entry, view))
            .unwrap_or_default()
    }

    pub(crate) fn current_error(&self, entry: &FieldEntry, view: &dyn FormView) -> Option<String> {
        let raw = view.value(entry.id())?;
        self.evaluate_entry(entry, &raw, view).error
    }

    pub(crate) fn evaluate_entry(
        &self,
        entry: &FieldEntry,
        raw: &str,
        view: &dyn FormView,
    ) -> EvaluationResult {
        let formatted_value = normalize(entry.rule(), raw);
        let error = self.first_error(entry, formatted_value.trim(), view);
        log::trace!(
            "[validate] {} = {:?} -> {:?}",
            entry.id(),
            formatted_value,
            error
        );
        EvaluationResult {
            formatted_value,
            error,
        }
    }

    fn first_error(&self, entry: &FieldEntry, trimmed: &str, view: &dyn FormView) -> Option<String> {
        let rule = entry.rule();

        if trimmed.is_empty() {
            return rule
                .is_required()
                .then(|| entry.message(RuleKind::Required));
        }

        let len = trimmed.chars().count();
        if rule.min().is_some_and(|min| len < min) {
            return Some(entry.message(RuleKind::MinLength));
        }
        if rule.max().is_some_and(|max| len > max) {
            return Some(entry.message(RuleKind::MaxLength));
        }
        if entry.pattern().is_some_and(|re| !re.is_match(trimmed)) {
            return Some(entry.message(RuleKind::Pattern));
        }

        let check = rule.check.as_ref()?;
        let siblings = self.siblings(entry, view);
        check(trimmed, &siblings).filter(|message| !message.is_empty())
    }

    /// Current normalized values of the fields the rule depends on.
    fn siblings(&self, entry: &FieldEntry, view: &dyn FormView) -> Siblings {
        let mut siblings = Siblings::new();
        for dependency in entry.rule().depends_on() {
            let raw = view.value(dependency).unwrap_or_default();
            let value = match self.rules.field(dependency) {
                Some(sibling) => normalize(sibling.rule(), &raw),
                None => raw,
            };
            siblings.insert(dependency.as_str(), value);
        }
        siblings
    }
}
