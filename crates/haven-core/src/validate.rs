//! Input sanitization and field validation.
//!
//! Every handler runs user input through the same pipeline: sanitize each
//! string, collect the required fields that came back empty, then check
//! formats. Errors stay flat messages; there are no structured codes.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length of any sanitized field.
pub const MAX_FIELD_LEN: usize = 1000;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

/// Sanitizes a single input field.
///
/// Trims whitespace, strips angle brackets, and truncates to
/// [`MAX_FIELD_LEN`] characters. A field that is empty after trimming is
/// treated as absent by [`missing_fields`].
#[must_use]
pub fn sanitize(input: &str) -> String {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .take(MAX_FIELD_LEN)
        .collect();
    cleaned
}

/// Sanitizes an optional field, mapping empty results to `None`.
#[must_use]
pub fn sanitize_opt(input: Option<&str>) -> Option<String> {
    input.map(sanitize).filter(|s| !s.is_empty())
}

/// Returns the names of required fields whose values are absent or empty.
///
/// The declaration order of `fields` is preserved so error messages list
/// exactly the missing names in a stable order.
#[must_use]
pub fn missing_fields(fields: &[(&str, Option<&str>)]) -> Vec<String> {
    fields
        .iter()
        .filter(|(_, value)| value.map(str::trim).map_or(true, str::is_empty))
        .map(|(name, _)| (*name).to_string())
        .collect()
}

/// Checks an email address against the suite-wide format regex.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Parses a donation amount from its wire representation.
///
/// Amounts arrive as strings from web forms; non-numeric or non-positive
/// values are rejected.
pub fn parse_amount(raw: &str) -> crate::Result<f64> {
    let amount: f64 = raw
        .trim()
        .parse()
        .map_err(|_| crate::Error::validation(format!("Invalid donation amount: {raw}")))?;
    if amount <= 0.0 || !amount.is_finite() {
        return Err(crate::Error::validation(format!(
            "Donation amount must be positive: {raw}"
        )));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_angle_brackets() {
        assert_eq!(sanitize("  <script>hi</script>  "), "scripthi/script");
        assert_eq!(sanitize("plain text"), "plain text");
    }

    #[test]
    fn test_sanitize_truncates() {
        let long = "a".repeat(MAX_FIELD_LEN + 50);
        assert_eq!(sanitize(&long).len(), MAX_FIELD_LEN);
    }

    #[test]
    fn test_sanitize_opt_maps_empty_to_none() {
        assert_eq!(sanitize_opt(Some("   ")), None);
        assert_eq!(sanitize_opt(Some(" x ")), Some("x".to_string()));
        assert_eq!(sanitize_opt(None), None);
    }

    #[test]
    fn test_missing_fields_lists_exact_names() {
        let missing = missing_fields(&[
            ("firstName", Some("John")),
            ("lastName", Some("")),
            ("email", None),
            ("message", Some("hello there friend")),
        ]);
        assert_eq!(missing, vec!["lastName", "email"]);
    }

    #[test]
    fn test_email_format() {
        assert!(is_valid_email("john@x.com"));
        assert!(is_valid_email("a.b+c@sub.domain.org"));
        assert!(!is_valid_email("john@x"));
        assert!(!is_valid_email("john x@x.com"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("john@.com"));
    }

    #[test]
    fn test_parse_amount() {
        assert!((parse_amount("100").unwrap() - 100.0).abs() < f64::EPSILON);
        assert!((parse_amount(" 49.99 ").unwrap() - 49.99).abs() < f64::EPSILON);
        assert!(parse_amount("free").is_err());
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("-5").is_err());
        assert!(parse_amount("NaN").is_err());
    }
}
