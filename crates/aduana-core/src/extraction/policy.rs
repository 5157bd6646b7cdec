//! Validity and confidence policy applied after extraction.

use crate::models::config::ExtractionConfig;
use crate::models::document::{CustomsRecord, ExtractionMethod};

/// Outcome of checking a record's critical fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validity {
    pub valid: bool,
    /// Critical fields that are blank, in declaration order.
    pub missing: Vec<&'static str>,
}

impl Validity {
    /// Comment attached to an invalid record; empty when valid.
    pub fn comment(&self) -> String {
        if self.valid {
            String::new()
        } else {
            format!("missing critical fields: {}", self.missing.join(", "))
        }
    }
}

/// A record is valid exactly when none of its critical fields are blank.
pub fn validate(record: &CustomsRecord) -> Validity {
    let missing: Vec<&'static str> = record
        .critical_fields()
        .into_iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| name)
        .collect();

    Validity {
        valid: missing.is_empty(),
        missing,
    }
}

/// Fixed confidence for the pipeline that produced a document.
pub fn confidence(config: &ExtractionConfig, method: ExtractionMethod) -> f32 {
    match method {
        ExtractionMethod::ImageOcr => config.image_confidence,
        ExtractionMethod::Text => config.text_confidence,
    }
}
