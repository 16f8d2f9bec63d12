use std::sync::OnceLock;

use regex::Regex;

/// Digits in a complete UK mobile number (`07` + 9 digits).
pub const UK_MOBILE_DIGITS: usize = 11;

const SPLIT_AFTER: usize = 5;

fn uk_mobile_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^07\d{9}$").expect("static UK mobile pattern"))
}

/// Applies the `07XXX XXXXXX` input mask to a raw edit.
///
/// Returns `None` when the edit must be rejected: a character other than a
/// digit or space, a prefix other than `07` once two digits are present, or
/// more than eleven digits.
pub fn format_uk_mobile(raw: &str) -> Option<String> {
    if !raw.chars().all(|c| c.is_ascii_digit() || c == ' ') {
        return None;
    }

    let digits: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    if digits.len() >= 2 && !digits.starts_with("07") {
        return None;
    }

    if digits.len() > UK_MOBILE_DIGITS {
        return None;
    }

    if digits.len() > SPLIT_AFTER {
        Some(format!("{} {}", &digits[..SPLIT_AFTER], &digits[SPLIT_AFTER..]))
    } else {
        Some(digits)
    }
}

/// Resolves an edit against the current field value; rejected edits keep `current`.
pub fn apply_edit(current: &str, input: &str) -> String {
    format_uk_mobile(input).unwrap_or_else(|| current.to_string())
}

pub fn is_valid_uk_mobile(raw: &str) -> bool {
    let digits: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    uk_mobile_pattern().is_match(&digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_full_number_with_single_space() {
        assert_eq!(format_uk_mobile("07700900123").as_deref(), Some("07700 900123"));
        assert!(is_valid_uk_mobile("07700900123"));
        assert!(is_valid_uk_mobile("07700 900123"));
    }

    #[test]
    fn rejects_wrong_prefix_after_two_digits() {
        assert_eq!(format_uk_mobile("0"), Some("0".to_string()));
        assert_eq!(format_uk_mobile("08"), None);
        assert_eq!(format_uk_mobile("08700900123"), None);
        assert!(!is_valid_uk_mobile("08700900123"));
    }

    #[test]
    fn rejects_non_digit_characters() {
        assert_eq!(format_uk_mobile("0770a"), None);
        assert_eq!(format_uk_mobile("+447700900123"), None);
        assert_eq!(apply_edit("07700", "07700-"), "07700");
    }

    #[test]
    fn rejects_more_than_eleven_digits() {
        assert_eq!(format_uk_mobile("077009001234"), None);
        assert_eq!(apply_edit("07700 900123", "07700 9001234"), "07700 900123");
    }

    #[test]
    fn partial_numbers_are_accepted_but_invalid() {
        assert_eq!(format_uk_mobile("07700").as_deref(), Some("07700"));
        assert_eq!(format_uk_mobile("077009").as_deref(), Some("07700 9"));
        assert_eq!(format_uk_mobile("0770 09").as_deref(), Some("07700 9"));
        assert!(!is_valid_uk_mobile("07700 9"));
        assert_eq!(format_uk_mobile("").as_deref(), Some(""));
    }
}
