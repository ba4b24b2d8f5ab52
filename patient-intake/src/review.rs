//! Review summary shown once the form is valid.

use formguard::FormView;

use crate::submission::Submission;

/// One labelled line of the review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRow {
    pub label: &'static str,
    pub value: String,
}

/// Collect the review rows from the form's current (normalized) values.
pub fn review(view: &dyn FormView, submission: &Submission) -> Vec<ReviewRow> {
    let value = |field: &str| view.value(field).unwrap_or_default();
    let selection = |group: &str| view.selection(group).unwrap_or_default();

    let full_name = [value("fname"), value("minitial"), value("lname")]
        .iter()
        .flat_map(|part| part.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ");

    let mut address = vec![value("address1")];
    let address2 = value("address2");
    if !address2.is_empty() {
        address.push(address2);
    }
    address.push(format!(
        "{}, {} {}",
        value("city"),
        value("state"),
        value("zip")
    ));

    let conditions = if submission.conditions.is_empty() {
        "None".to_string()
    } else {
        submission.conditions.join(", ")
    };
    let symptoms = match value("symptoms") {
        s if s.is_empty() => "None".to_string(),
        s => s,
    };

    let rows = [
        ("Full Name", full_name),
        ("Date of Birth", value("dob")),
        ("SSN", mask_ssn(&value("ssn"))),
        ("Address", address.join("\n")),
        ("Email", value("email")),
        ("Phone", value("phone")),
        ("Gender", selection("gender")),
        ("COVID-19 Vaccinated", selection("vaccinated")),
        ("Has Insurance", selection("insurance")),
        ("Current Health (1-10)", submission.health_scale.to_string()),
        ("Medical Conditions", conditions),
        ("Current Symptoms", symptoms),
        ("User ID", value("userid")),
    ];

    rows.into_iter()
        .map(|(label, value)| ReviewRow {
            label,
            value: display_value(&value),
        })
        .collect()
}

/// Replace every digit except the trailing four with `*`.
///
/// Only a final run of digits is kept, so `123-45-6789` becomes `***-**-6789`.
pub fn mask_ssn(ssn: &str) -> String {
    let chars: Vec<char> = ssn.chars().collect();
    let trailing = chars.iter().rev().take_while(|c| c.is_ascii_digit()).count();
    let keep_from = chars.len() - trailing.min(4);

    chars
        .iter()
        .enumerate()
        .map(|(i, &c)| if i < keep_from && c.is_ascii_digit() { '*' } else { c })
        .collect()
}

/// Capitalize the first letter; blank values read `N/A`.
fn display_value(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => "N/A".to_string(),
    }
}

/// Render rows as aligned `label: value` lines.
pub fn render(rows: &[ReviewRow]) -> String {
    let width = rows.iter().map(|row| row.label.len()).max().unwrap_or_default() + 1;
    let mut out = String::new();
    for row in rows {
        let mut lines = row.value.lines();
        let first = lines.next().unwrap_or_default();
        out.push_str(&format!("{:<width$} {}\n", format!("{}:", row.label), first));
        for line in lines {
            out.push_str(&format!("{:<width$} {}\n", "", line));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_ssn() {
        assert_eq!(mask_ssn("123-45-6789"), "***-**-6789");
        assert_eq!(mask_ssn("123456789"), "*****6789");
        assert_eq!(mask_ssn("12"), "12");
        assert_eq!(mask_ssn(""), "");
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value("female"), "Female");
        assert_eq!(display_value(""), "N/A");
        assert_eq!(display_value("123 Main St"), "123 Main St");
    }

    #[test]
    fn test_render_indents_continuation_lines() {
        let rows = vec![
            ReviewRow {
                label: "Address",
                value: "1 Main St\nHouston, TX 77001".to_string(),
            },
            ReviewRow {
                label: "SSN",
                value: "***-**-6789".to_string(),
            },
        ];
        assert_eq!(
            render(&rows),
            "Address: 1 Main St\n         Houston, TX 77001\nSSN:     ***-**-6789\n"
        );
    }
}
