//! The patient registration form.

use formguard::{
    ConfigError, DigitGroups, EventKind, ExclusiveGroup, Member, Registry, Rule, RuleSet,
};

use crate::checks;

pub const NAME_SLOT: &str = "fname-error";
pub const DOB_SLOT: &str = "dob-error";
pub const SSN_SLOT: &str = "ssn-error";
pub const ADDRESS1_SLOT: &str = "address1-error";
pub const ADDRESS2_SLOT: &str = "address2-error";
pub const ADDRESS_SLOT: &str = "address-error";
pub const EMAIL_SLOT: &str = "email-error";
pub const PHONE_SLOT: &str = "phone-error";
pub const RADIO_SLOT: &str = "radio-error";
pub const SYMPTOMS_SLOT: &str = "symptoms-error";
pub const USERID_SLOT: &str = "userid-error";
pub const PASS1_SLOT: &str = "pass1-error";
pub const PASS2_SLOT: &str = "pass2-error";

pub const GROUPS: [&str; 3] = ["gender", "vaccinated", "insurance"];

const NAME_PATTERN: &str = "^[a-zA-Z'-]+$";

/// Rule table for the registration form.
pub fn patient_rules() -> Result<RuleSet, ConfigError> {
    RuleSet::builder()
        .field(
            "fname",
            Rule::new()
                .required("First name is required.")
                .pattern(
                    NAME_PATTERN,
                    "First name can only contain letters, apostrophes, and dashes.",
                )
                .max_length(30, "First name must be 30 characters or less.")
                .slot(NAME_SLOT),
        )
        .field(
            "lname",
            Rule::new()
                .required("Last name is required.")
                .pattern(
                    NAME_PATTERN,
                    "Last name can only contain letters, apostrophes, and dashes.",
                )
                .max_length(30, "Last name must be 30 characters or less.")
                .slot(NAME_SLOT),
        )
        .field(
            "minitial",
            Rule::new().pattern("^[a-zA-Z]$", "Middle initial must be a single letter."),
        )
        .field(
            "dob",
            Rule::new()
                .required("Date of birth is required.")
                .check(checks::date_of_birth_today)
                .slot(DOB_SLOT),
        )
        .field(
            "ssn",
            Rule::new()
                .required("Social Security Number is required.")
                .pattern(r"^\d{3}-\d{2}-\d{4}$", "SSN must be in XXX-XX-XXXX format.")
                .formatter(|value| DigitGroups::ssn().format(value))
                .slot(SSN_SLOT),
        )
        .field(
            "address1",
            Rule::new()
                .required("Address Line 1 is required.")
                .length(2, 30, "Address must be between 2 and 30 characters.")
                .slot(ADDRESS1_SLOT),
        )
        .field(
            "address2",
            Rule::new()
                .length(
                    2,
                    30,
                    "Address Line 2 must be between 2 and 30 characters if provided.",
                )
                .slot(ADDRESS2_SLOT),
        )
        .field(
            "city",
            Rule::new()
                .required("City is required.")
                .length(2, 30, "City must be between 2 and 30 characters.")
                .slot(ADDRESS_SLOT),
        )
        .field(
            "state",
            Rule::new()
                .required("State is required.")
                .on(EventKind::Change)
                .slot(ADDRESS_SLOT),
        )
        .field(
            "zip",
            Rule::new()
                .required("Zip code is required.")
                .pattern(
                    r"^\d{5}(-\d{4})?$",
                    "Zip code must be in 12345 or 12345-6789 format.",
                )
                .slot(ADDRESS_SLOT),
        )
        .field(
            "email",
            Rule::new()
                .required("Email address is required.")
                .pattern(
                    r"^[^\s@]+@[^\s@]+\.[^\s@]+$",
                    "Please enter a valid email address (name@domain.tld).",
                )
                .lowercase()
                .slot(EMAIL_SLOT),
        )
        .field(
            "phone",
            Rule::new()
                .required("Phone number is required.")
                .pattern(
                    "^[0-9]{3}-[0-9]{3}-[0-9]{4}$",
                    "Phone must be in XXX-XXX-XXXX format.",
                )
                .formatter(|value| DigitGroups::phone().format(value))
                .slot(PHONE_SLOT),
        )
        .group_slot(RADIO_SLOT)
        .group(ExclusiveGroup::new("gender"))
        .group(
            ExclusiveGroup::new("vaccinated")
                .with_message("COVID-19 vaccination status is required."),
        )
        .group(ExclusiveGroup::new("insurance"))
        .field(
            "symptoms",
            Rule::new()
                .check(checks::no_double_quotes)
                .on(EventKind::Change)
                .slot(SYMPTOMS_SLOT),
        )
        .field(
            "userid",
            Rule::new()
                .required("User ID is required.")
                .length(5, 30, "User ID must be between 5 and 30 characters.")
                .pattern(
                    "^[a-zA-Z][a-zA-Z0-9_-]*$",
                    "User ID can only contain letters, numbers, underscores, and dashes.",
                )
                .lowercase()
                .check(checks::starts_with_letter)
                .slot(USERID_SLOT),
        )
        .field(
            "pass1",
            Rule::new()
                .required("Password is required.")
                .length(8, 30, "Password must be between 8 and 30 characters.")
                .check_with(["userid"], |value, siblings| {
                    checks::password_strength(value, siblings.get("userid"))
                })
                .slot(PASS1_SLOT),
        )
        .field(
            "pass2",
            Rule::new()
                .required("Password confirmation is required.")
                .check_with(["pass1"], |value, siblings| {
                    checks::passwords_match(value, siblings.get("pass1"))
                })
                .slot(PASS2_SLOT),
        )
        .build()
}

/// Label of the validate button for a gate state.
pub fn gate_label(all_valid: bool) -> &'static str {
    if all_valid {
        "ALL FIELDS VALID \u{2713}"
    } else {
        "VALIDATE"
    }
}

/// Display slots in the order their first field or group was declared.
pub fn slots_in_order(rules: &RuleSet) -> Vec<&str> {
    let mut slots: Vec<&str> = Vec::new();
    for member in rules.members() {
        let slot = match member {
            Member::Field(entry) => entry.rule().slot_name(),
            Member::Group(_) => rules.group_slot(),
        };
        if let Some(slot) = slot {
            if !slots.contains(&slot) {
                slots.push(slot);
            }
        }
    }
    slots
}

/// Named checks for loading the form from a JSON rule table.
pub fn registry() -> Registry {
    Registry::with_builtins()
        .check("date_of_birth", |value, _| checks::date_of_birth_today(value))
        .check("no_double_quotes", |value, _| checks::no_double_quotes(value))
        .check("starts_with_letter", |value, _| checks::starts_with_letter(value))
        .check("password_strength", |value, siblings| {
            checks::password_strength(value, siblings.get("userid"))
        })
        .check("passwords_match", |value, siblings| {
            checks::passwords_match(value, siblings.get("pass1"))
        })
}
