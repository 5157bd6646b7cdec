//! OCR text normalization.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref INNER_SPACES: Regex = Regex::new(r"\s{2,}").unwrap();
}

/// Collapse OCR output onto a single line.
///
/// Line breaks become spaces, every whitespace run becomes one space and the
/// result is trimmed. Case and accents are left untouched. The function is
/// idempotent.
pub fn normalize_text(raw: &str) -> String {
    let single_line = raw.replace("\r\n", " ").replace(['\n', '\r'], " ");
    WHITESPACE_RUN
        .replace_all(&single_line, " ")
        .trim()
        .to_string()
}

/// Tidy a captured value: trim, drop dangling separators, squeeze spaces.
pub fn clean_value(value: &str) -> String {
    let trimmed = value
        .trim()
        .trim_matches(|c: char| matches!(c, ':' | ';' | ',' | '-' | '|') || c.is_whitespace());
    INNER_SPACES.replace_all(trimmed, " ").into_owned()
}

/// Clean a value and upper-case it; `None` when nothing is left.
pub fn upper_value(value: &str) -> Option<String> {
    let cleaned = clean_value(value).to_uppercase();
    (!cleaned.is_empty()).then_some(cleaned)
}

/// A person or company name: letters required, digits rejected.
pub fn name_value(value: &str) -> Option<String> {
    let cleaned = upper_value(value)?;
    let letters = cleaned.chars().filter(|c| c.is_alphabetic()).count();
    if letters < 3 || cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    Some(cleaned)
}

/// Upper-case and strip spaces and dashes (plates, agent codes).
pub fn compact_value(value: &str) -> Option<String> {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '.')
        .collect::<String>()
        .to_uppercase();
    (!compact.is_empty()).then_some(compact)
}

/// Reference numbers (B/L, booking): upper-case, must contain a digit.
pub fn reference_value(value: &str) -> Option<String> {
    let cleaned = upper_value(value)?.replace(' ', "");
    cleaned.chars().any(|c| c.is_ascii_digit()).then_some(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_line_breaks() {
        assert_eq!(
            normalize_text("Folio\r\n4560010758\n\nTotal   Pagado\t8.153.962  "),
            "Folio 4560010758 Total Pagado 8.153.962"
        );
    }

    #[test]
    fn test_normalize_keeps_case_and_accents() {
        assert_eq!(normalize_text("  Aceptación\nDÍA "), "Aceptación DÍA");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text(" \r\n\t "), "");
    }

    #[test]
    fn test_clean_value() {
        assert_eq!(clean_value(" : LAS  CONDES - "), "LAS CONDES");
        assert_eq!(clean_value("RECIBIDO CONFORME"), "RECIBIDO CONFORME");
    }

    #[test]
    fn test_name_value_rejects_digits() {
        assert_eq!(name_value("Juan Pérez"), Some("JUAN PÉREZ".to_string()));
        assert_eq!(name_value("C47"), None);
        assert_eq!(name_value("  "), None);
    }

    #[test]
    fn test_compact_value() {
        assert_eq!(compact_value("hjkl-45"), Some("HJKL45".to_string()));
        assert_eq!(compact_value("C 47"), Some("C47".to_string()));
    }

    #[test]
    fn test_reference_value_requires_digit() {
        assert_eq!(reference_value("maeu245678901"), Some("MAEU245678901".to_string()));
        assert_eq!(reference_value("NUMBER"), None);
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(s in "\\PC*") {
            let once = normalize_text(&s);
            prop_assert_eq!(normalize_text(&once), once.clone());
        }

        #[test]
        fn prop_normalize_has_no_line_breaks_or_runs(s in "[a-z \\r\\n\\t]{0,64}") {
            let out = normalize_text(&s);
            prop_assert!(!out.contains('\n'));
            prop_assert!(!out.contains("  "));
            prop_assert_eq!(out.trim(), out.as_str());
        }
    }
}
