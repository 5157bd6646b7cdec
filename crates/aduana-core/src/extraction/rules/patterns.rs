//! Common regex patterns for Chilean customs documents.

use lazy_static::lazy_static;
use regex::Regex;

/// Fragments that label patterns may reference by placeholder.
///
/// Value placeholders carry exactly one capture group; `<NUM>` is a
/// non-capturing "número" label (N°, Nº, Nro., No, Número, ...).
pub const PLACEHOLDERS: &[(&str, &str)] = &[
    ("<NUM>", r"(?:n\s?[°º]\.?|n[uú]mero|nro\.?|num\.?|no\.?|n\.)"),
    ("<RUT>", r"(\d{1,2}[.,]?\d{3}[.,]?\d{3}\s?-\s?[\dkK])"),
    (
        "<DATE>",
        r"(\d{4}[-/]\d{1,2}[-/]\d{1,2}|\d{1,2}\s?[-/.]\s?\d{1,2}\s?[-/.]\s?\d{2,4}|\d{1,2}\s*de\s+[a-zA-ZñÑáéíóúÁÉÍÓÚ]{3,10}\.?\s*(?:de|del)?\s*\d{4}|\d{8})",
    ),
    ("<AMOUNT>", r"(\d{1,3}(?:\.\d{3})+(?:,\d{1,2})?|\d+(?:,\d{1,2})?)"),
    ("<USD>", r"(\d{1,3}(?:,\d{3})+(?:\.\d{1,2})?|\d+(?:\.\d{1,2})?)"),
    ("<CONTAINER>", r"([A-Z]{4}\s?-?\s?\d{6}\s?-?\s?\d)"),
];

/// Replace every placeholder in a pattern with its fragment.
pub fn expand_placeholders(pattern: &str) -> String {
    PLACEHOLDERS
        .iter()
        .fold(pattern.to_string(), |acc, (name, fragment)| {
            acc.replace(name, fragment)
        })
}

lazy_static! {
    // Date shapes, tried in this order by `parse_date`
    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})[-/](\d{1,2})[-/](\d{1,2})\b"
    ).unwrap();

    pub static ref DATE_DMY: Regex = Regex::new(
        r"\b(\d{1,2})\s?[-/.]\s?(\d{1,2})\s?[-/.]\s?(\d{4}|\d{2})\b"
    ).unwrap();

    pub static ref DATE_SPANISH_LONG: Regex = Regex::new(
        r"(?i)\b(\d{1,2})\s*(?:de\s+)?([a-zñáéíóú]{3,10})\.?\s*(?:de|del)?\s*(\d{4})\b"
    ).unwrap();

    pub static ref DATE_COMPACT: Regex = Regex::new(
        r"\b(\d{2})(\d{2})(\d{4})\b"
    ).unwrap();

    // Letterheads
    pub static ref JORGE_STEIN: Regex = Regex::new(r"(?i)jorge\s*stein").unwrap();
    pub static ref ALBERTO_RUBIO: Regex = Regex::new(r"(?i)alberto\s*rubio").unwrap();
    pub static ref MAERSK: Regex = Regex::new(r"(?i)\bmaersk\b").unwrap();
    pub static ref MSC: Regex = Regex::new(r"(?i)mediterranean\s+shipping|\bmsc\b").unwrap();
    pub static ref IAN_TAYLOR: Regex = Regex::new(r"(?i)ian\s*taylor").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_placeholders() {
        let expanded = expand_placeholders(r"(?i)rut\s*:?\s*<RUT>");
        assert!(expanded.starts_with(r"(?i)rut\s*:?\s*(\d{1,2}"));
        assert!(!expanded.contains('<'));
    }

    #[test]
    fn test_placeholders_compile() {
        for (name, fragment) in PLACEHOLDERS {
            assert!(Regex::new(fragment).is_ok(), "{name} does not compile");
        }
    }

    #[test]
    fn test_value_placeholders_have_one_group() {
        for (name, fragment) in PLACEHOLDERS.iter().filter(|(n, _)| *n != "<NUM>") {
            let re = Regex::new(fragment).unwrap();
            assert_eq!(re.captures_len(), 2, "{name}");
        }
    }
}
