//! Value normalization applied before validation.

use std::sync::Arc;

use crate::rule::{Formatter, Rule};

/// Normalize a raw value according to a rule.
///
/// Case-folds first (when the rule asks for it), then applies the rule's
/// formatter. The result is what the host should display in place of the raw
/// input.
pub fn normalize(rule: &Rule, raw: &str) -> String {
    let value = if rule.lowercase {
        raw.to_lowercase()
    } else {
        raw.to_string()
    };

    match &rule.formatter {
        Some(format) => format(&value),
        None => value,
    }
}

/// Groups the digits of a value with separators at fixed offsets.
///
/// Non-digits are dropped and the digits are truncated to `max_digits`, so
/// formatting an already formatted value is a no-op.
///
/// # Example
///
/// ```
/// use formguard::DigitGroups;
///
/// let phone = DigitGroups::phone();
/// assert_eq!(phone.format("1234567890"), "123-456-7890");
/// assert_eq!(phone.format("1234"), "123-4");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitGroups {
    breaks: Vec<usize>,
    max_digits: usize,
    separator: char,
}

impl DigitGroups {
    /// Insert `-` before each digit offset in `breaks`.
    pub fn new(breaks: impl Into<Vec<usize>>, max_digits: usize) -> Self {
        Self {
            breaks: breaks.into(),
            max_digits,
            separator: '-',
        }
    }

    /// `XXX-XXX-XXXX`
    pub fn phone() -> Self {
        Self::new([3, 6], 10)
    }

    /// `XXX-XX-XXXX`
    pub fn ssn() -> Self {
        Self::new([3, 5], 9)
    }

    /// Use a different separator. Digits are rejected since they would be kept
    /// on the next pass.
    pub fn with_separator(mut self, separator: char) -> Self {
        assert!(
            !separator.is_ascii_digit(),
            "digit separator must not be a digit"
        );
        self.separator = separator;
        self
    }

    pub fn format(&self, value: &str) -> String {
        let digits: Vec<char> = value
            .chars()
            .filter(char::is_ascii_digit)
            .take(self.max_digits)
            .collect();

        let mut out = String::with_capacity(digits.len() + self.breaks.len());
        for (i, digit) in digits.into_iter().enumerate() {
            if i > 0 && self.breaks.contains(&i) {
                out.push(self.separator);
            }
            out.push(digit);
        }
        out
    }

    /// Convert into a rule formatter.
    pub fn into_formatter(self) -> Formatter {
        Arc::new(move |value| self.format(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_break_points() {
        let phone = DigitGroups::phone();
        assert_eq!(phone.format("1234567890"), "123-456-7890");
        assert_eq!(phone.format("123"), "123");
        assert_eq!(phone.format("1234"), "123-4");
        assert_eq!(phone.format("1234567"), "123-456-7");
        assert_eq!(phone.format("(123) 456-7890 ext 12"), "123-456-7890");
    }

    #[test]
    fn test_ssn_break_points() {
        let ssn = DigitGroups::ssn();
        assert_eq!(ssn.format("123456789"), "123-45-6789");
        assert_eq!(ssn.format("12345"), "123-45");
        assert_eq!(ssn.format("123456"), "123-45-6");
        assert_eq!(ssn.format("1234567890"), "123-45-6789");
        assert_eq!(ssn.format("abc"), "");
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let samples = [
            "",
            "1",
            "123",
            "1234",
            "12345",
            "123456",
            "1234567890",
            "12-34 56",
            "555.867.5309",
            "9999999999999",
        ];
        for groups in [DigitGroups::phone(), DigitGroups::ssn()] {
            for sample in samples {
                let once = groups.format(sample);
                assert_eq!(groups.format(&once), once, "sample {:?}", sample);
            }
        }
    }

    #[test]
    fn test_custom_separator() {
        let groups = DigitGroups::new([4, 8, 12], 16).with_separator(' ');
        assert_eq!(groups.format("4111111111111111"), "4111 1111 1111 1111");
    }

    #[test]
    fn test_normalize_lowercases_before_formatting() {
        let rule = Rule::new()
            .lowercase()
            .formatter(|value| value.replace(' ', "_"));
        assert_eq!(normalize(&rule, "Jane Doe"), "jane_doe");
    }

    #[test]
    fn test_normalize_without_options_is_identity() {
        let rule = Rule::new();
        assert_eq!(normalize(&rule, "  Mixed Case  "), "  Mixed Case  ");
    }

    #[test]
    fn test_normalize_is_idempotent_with_formatter() {
        let rule = Rule::new()
            .lowercase()
            .formatter(|value| DigitGroups::ssn().format(value));
        for raw in ["123456789", "123-45-6789", "12a34", ""] {
            let once = normalize(&rule, raw);
            assert_eq!(normalize(&rule, &once), once);
        }
    }
}
