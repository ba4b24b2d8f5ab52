//! Custom checks for the registration form.
//!
//! Each returns an error message, or `None` when the value passes.

use chrono::{Local, Months, NaiveDate};

/// Oldest accepted date of birth, in years before today.
pub const MAX_AGE_YEARS: u32 = 120;

/// Characters that count as "special" for password strength.
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?`~";

/// Date of birth in `YYYY-MM-DD`, not in the future and at most
/// [`MAX_AGE_YEARS`] ago.
pub fn date_of_birth(value: &str, today: NaiveDate) -> Option<String> {
    let Ok(dob) = NaiveDate::parse_from_str(value, "%Y-%m-%d") else {
        return Some("Date of birth must be a valid date (YYYY-MM-DD).".to_string());
    };

    if dob > today {
        return Some("Date of birth cannot be in the future.".to_string());
    }

    let earliest = today
        .checked_sub_months(Months::new(MAX_AGE_YEARS * 12))
        .unwrap_or(NaiveDate::MIN);
    if dob < earliest {
        return Some(format!(
            "Date of birth cannot be more than {} years ago.",
            MAX_AGE_YEARS
        ));
    }

    None
}

/// [`date_of_birth`] against the local calendar date.
pub fn date_of_birth_today(value: &str) -> Option<String> {
    date_of_birth(value, Local::now().date_naive())
}

pub fn no_double_quotes(value: &str) -> Option<String> {
    value
        .contains('"')
        .then(|| "Double quotes are not allowed in symptoms description.".to_string())
}

pub fn starts_with_letter(value: &str) -> Option<String> {
    let starts = value.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
    (!starts).then(|| "User ID must start with a letter.".to_string())
}

/// Password complexity, and not the same as the user id (ignoring case).
pub fn password_strength(value: &str, userid: &str) -> Option<String> {
    if !value.chars().any(|c| c.is_ascii_uppercase()) {
        return Some("Password must contain at least one uppercase letter.".to_string());
    }
    if !value.chars().any(|c| c.is_ascii_lowercase()) {
        return Some("Password must contain at least one lowercase letter.".to_string());
    }
    if !value.chars().any(|c| c.is_ascii_digit()) {
        return Some("Password must contain at least one number.".to_string());
    }
    if !value.chars().any(|c| SPECIAL_CHARACTERS.contains(c)) {
        return Some("Password must contain at least one special character.".to_string());
    }
    if value.to_lowercase() == userid.to_lowercase() {
        return Some("Password cannot be the same as your User ID.".to_string());
    }
    None
}

/// Confirmation must equal the password exactly.
pub fn passwords_match(value: &str, password: &str) -> Option<String> {
    (value != password).then(|| "Passwords do not match.".to_string())
}
