//! The rule table for a whole form.

use std::collections::{HashMap, HashSet};

use regex::Regex;

use crate::error::ConfigError;
use crate::group::ExclusiveGroup;
use crate::rule::{Rule, RuleKind};

/// A field's rule with its pattern compiled.
#[derive(Debug, Clone)]
pub struct FieldEntry {
    id: String,
    rule: Rule,
    pattern: Option<Regex>,
}

impl FieldEntry {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub(crate) fn pattern(&self) -> Option<&Regex> {
        self.pattern.as_ref()
    }

    /// Message for a kind the rule declares. Presence is checked at build time.
    pub(crate) fn message(&self, kind: RuleKind) -> String {
        self.rule.message_for(kind).unwrap_or_default().to_string()
    }
}

/// A field or group, in declaration order.
#[derive(Debug, Clone, Copy)]
pub enum Member<'a> {
    Field(&'a FieldEntry),
    Group(&'a ExclusiveGroup),
}

impl<'a> Member<'a> {
    pub fn id(&self) -> &'a str {
        match *self {
            Member::Field(entry) => entry.id(),
            Member::Group(group) => group.name(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Field(usize),
    Group(usize),
}

/// Immutable rule table: fields, exclusive groups and cascade edges.
///
/// Built once at startup with [`RuleSet::builder`] and then shared read-only.
#[derive(Debug, Clone)]
pub struct RuleSet {
    fields: Vec<FieldEntry>,
    index: HashMap<String, usize>,
    groups: Vec<ExclusiveGroup>,
    group_slot: Option<String>,
    order: Vec<Slot>,
    dependents: HashMap<String, Vec<String>>,
}

impl RuleSet {
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    pub fn field(&self, id: &str) -> Option<&FieldEntry> {
        self.index.get(id).map(|&i| &self.fields[i])
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldEntry> {
        self.fields.iter()
    }

    pub fn groups(&self) -> &[ExclusiveGroup] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&ExclusiveGroup> {
        self.groups.iter().find(|group| group.name() == name)
    }

    /// Display slot shared by all exclusive groups.
    pub fn group_slot(&self) -> Option<&str> {
        self.group_slot.as_deref()
    }

    /// Fields and groups interleaved in declaration order.
    pub fn members(&self) -> impl Iterator<Item = Member<'_>> {
        self.order.iter().map(|slot| match *slot {
            Slot::Field(i) => Member::Field(&self.fields[i]),
            Slot::Group(i) => Member::Group(&self.groups[i]),
        })
    }

    /// Fields sharing a display slot, in declaration order.
    pub fn slot_fields<'a>(&'a self, slot: &'a str) -> impl Iterator<Item = &'a FieldEntry> {
        self.fields
            .iter()
            .filter(move |entry| entry.rule.slot_name() == Some(slot))
    }

    /// Fields whose checks read `id`, in declaration order.
    pub fn dependents(&self, id: &str) -> &[String] {
        self.dependents.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for [`RuleSet`].
///
/// # Example
///
/// ```
/// use formguard::{ExclusiveGroup, Rule, RuleSet};
///
/// let rules = RuleSet::builder()
///     .field("pass1", Rule::new().required("Password is required."))
///     .field(
///         "pass2",
///         Rule::new()
///             .required("Password confirmation is required.")
///             .check_with(["pass1"], |value, siblings| {
///                 (value != siblings.get("pass1")).then(|| "Passwords do not match.".to_string())
///             }),
///     )
///     .group_slot("radio-error")
///     .group(ExclusiveGroup::new("gender"))
///     .build()
///     .unwrap();
///
/// assert_eq!(rules.dependents("pass1"), ["pass2".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    fields: Vec<(String, Rule)>,
    groups: Vec<ExclusiveGroup>,
    group_slot: Option<String>,
    order: Vec<Slot>,
}

impl RuleSetBuilder {
    /// Declare a field. Declaration order decides slot priority and which
    /// error is reported first.
    pub fn field(mut self, id: impl Into<String>, rule: Rule) -> Self {
        self.order.push(Slot::Field(self.fields.len()));
        self.fields.push((id.into(), rule));
        self
    }

    /// Declare an exclusive (single-choice) group.
    pub fn group(mut self, group: ExclusiveGroup) -> Self {
        self.order.push(Slot::Group(self.groups.len()));
        self.groups.push(group);
        self
    }

    /// Set the display slot for the combined group message.
    pub fn group_slot(mut self, slot: impl Into<String>) -> Self {
        self.group_slot = Some(slot.into());
        self
    }

    /// Check the table and compile it.
    pub fn build(self) -> Result<RuleSet, ConfigError> {
        let mut index = HashMap::with_capacity(self.fields.len());
        let mut fields = Vec::with_capacity(self.fields.len());

        for (i, (id, rule)) in self.fields.into_iter().enumerate() {
            if index.insert(id.clone(), i).is_some() {
                return Err(ConfigError::DuplicateField(id));
            }

            for kind in rule.declared_kinds() {
                if rule.message_for(kind).is_none() {
                    return Err(ConfigError::MissingMessage { field: id, kind });
                }
            }

            let pattern = match rule.pattern_source() {
                Some(source) => {
                    Some(Regex::new(source).map_err(|source| ConfigError::InvalidPattern {
                        field: id.clone(),
                        source,
                    })?)
                }
                None => None,
            };

            fields.push(FieldEntry { id, rule, pattern });
        }

        let mut seen = HashSet::new();
        for group in &self.groups {
            if !seen.insert(group.name()) || index.contains_key(group.name()) {
                return Err(ConfigError::DuplicateGroup(group.name().to_string()));
            }
        }

        let mut dependents: HashMap<String, Vec<String>> = HashMap::new();
        for entry in &fields {
            for dependency in entry.rule.depends_on() {
                if !index.contains_key(dependency) {
                    return Err(ConfigError::UnknownDependency {
                        field: entry.id.clone(),
                        dependency: dependency.clone(),
                    });
                }
                dependents
                    .entry(dependency.clone())
                    .or_default()
                    .push(entry.id.clone());
            }
        }

        check_acyclic(&fields, &dependents)?;

        log::debug!(
            "[rules] built {} fields, {} groups, {} cascade sources",
            fields.len(),
            self.groups.len(),
            dependents.len()
        );

        Ok(RuleSet {
            fields,
            index,
            groups: self.groups,
            group_slot: self.group_slot,
            order: self.order,
            dependents,
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Reject cascade edges that could re-enter a field being validated.
fn check_acyclic(
    fields: &[FieldEntry],
    dependents: &HashMap<String, Vec<String>>,
) -> Result<(), ConfigError> {
    fn visit<'a>(
        id: &'a str,
        dependents: &'a HashMap<String, Vec<String>>,
        marks: &mut HashMap<&'a str, Mark>,
        path: &mut Vec<&'a str>,
    ) -> Result<(), ConfigError> {
        match marks.get(id) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => {
                let start = path.iter().position(|p| *p == id).unwrap_or_default();
                let mut cycle: Vec<String> = path[start..].iter().map(|p| p.to_string()).collect();
                cycle.push(id.to_string());
                return Err(ConfigError::DependencyCycle(cycle));
            }
            None => {}
        }

        marks.insert(id, Mark::Visiting);
        path.push(id);
        for next in dependents.get(id).into_iter().flatten() {
            visit(next, dependents, marks, path)?;
        }
        path.pop();
        marks.insert(id, Mark::Done);
        Ok(())
    }

    let mut marks = HashMap::new();
    let mut path = Vec::new();
    for entry in fields {
        visit(&entry.id, dependents, &mut marks, &mut path)?;
    }
    Ok(())
}
