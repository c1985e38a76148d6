//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}

/// Validate a display field's character length against an inclusive range.
pub(crate) fn validate_text_len(
    value: &str,
    label: &str,
    min: usize,
    max: usize,
) -> ResultEngine<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(EngineError::InvalidField(format!(
            "{label} must be between {min} and {max} characters"
        )));
    }
    Ok(())
}

/// Validate that a field looks like an http(s) URL.
///
/// Kept deliberately shallow: the stored value is display metadata, not
/// something the engine dereferences.
pub(crate) fn validate_url(value: &str, label: &str) -> ResultEngine<()> {
    let valid = (value.starts_with("http://") || value.starts_with("https://"))
        && value.len() > "https://".len()
        && !value.contains(char::is_whitespace);
    if !valid {
        return Err(EngineError::InvalidField(format!(
            "{label} must be an http(s) URL"
        )));
    }
    Ok(())
}

/// NFC-normalize user-supplied identifying text (usernames) so lookups are
/// stable across input methods.
pub(crate) fn nfc_normalize(value: &str) -> String {
    value.trim().nfc().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_validation() {
        assert!(validate_url("https://example.com/x", "link").is_ok());
        assert!(validate_url("http://example.com", "link").is_ok());
        assert!(validate_url("ftp://example.com", "link").is_err());
        assert!(validate_url("https://", "link").is_err());
        assert!(validate_url("https://exa mple.com", "link").is_err());
    }

    #[test]
    fn text_len_counts_chars_not_bytes() {
        assert!(validate_text_len("càffè", "name", 1, 5).is_ok());
        assert!(validate_text_len("", "name", 1, 5).is_err());
        assert!(validate_text_len("toolong", "name", 1, 5).is_err());
    }

    #[test]
    fn nfc_normalization_trims_and_composes() {
        // "e" + combining acute composes to a single scalar.
        assert_eq!(nfc_normalize(" e\u{0301} "), "\u{00e9}");
    }
}
