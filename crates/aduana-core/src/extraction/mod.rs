//! Rule-based field extraction from OCR text.

pub mod cascade;
pub mod documents;
pub mod normalize;
pub mod policy;
pub mod rules;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, warn};

use crate::error::ExtractionError;
use crate::models::document::{CustomsRecord, DocumentKind};
use crate::models::records::CustomsFields;

pub use cascade::{Cascade, ExtractionMatch};
pub use documents::*;
pub use normalize::normalize_text;
pub use policy::{validate, Validity};

/// Populates one record type from normalized text.
pub trait DocumentExtractor {
    type Output: CustomsFields;

    fn kind(&self) -> DocumentKind;

    /// Fill `record` in place, field by field.
    ///
    /// Fields are written as soon as they are found so that a record stays
    /// usable if a later field fails.
    fn extract_into(&self, text: &str, record: &mut Self::Output);

    fn extract(&self, text: &str) -> Self::Output {
        let mut record = Self::Output::default();
        self.extract_into(text, &mut record);
        record
    }
}

/// Record extracted from text, with the text it came from.
#[derive(Debug, Clone)]
pub struct ExtractionOutcome {
    pub record: CustomsRecord,
    /// Normalized text the record was extracted from.
    pub text: String,
    /// Set when extraction aborted part-way; the record keeps what was found.
    pub failure: Option<ExtractionError>,
}

/// Normalize `raw_text` and extract a record of the given kind.
///
/// Never fails: an extractor that aborts leaves a partial record and a
/// failure description.
pub fn extract_document(kind: DocumentKind, raw_text: &str) -> ExtractionOutcome {
    let text = normalize_text(raw_text);
    debug!(%kind, chars = text.len(), "extracting fields");

    let (record, failure) = match kind {
        DocumentKind::CarnetAduanero => run_isolated(
            &CarnetAduaneroExtractor::new(),
            &text,
            CustomsRecord::CarnetAduanero,
        ),
        DocumentKind::DeclaracionIngreso => run_isolated(
            &DeclaracionIngresoExtractor::new(),
            &text,
            CustomsRecord::DeclaracionIngreso,
        ),
        DocumentKind::DocumentoRecepcion => run_isolated(
            &DocumentoRecepcionExtractor::new(),
            &text,
            CustomsRecord::DocumentoRecepcion,
        ),
        DocumentKind::GuiaDespacho => run_isolated(
            &GuiaDespachoExtractor::new(),
            &text,
            CustomsRecord::GuiaDespacho,
        ),
        DocumentKind::ComprobanteTransaccion => run_isolated(
            &ComprobanteTransaccionExtractor::new(),
            &text,
            CustomsRecord::ComprobanteTransaccion,
        ),
        DocumentKind::SeleccionAforo => run_isolated(
            &SeleccionAforoExtractor::new(),
            &text,
            CustomsRecord::SeleccionAforo,
        ),
        DocumentKind::TactAdc => {
            run_isolated(&TactAdcExtractor::new(), &text, CustomsRecord::TactAdc)
        }
    };

    ExtractionOutcome {
        record,
        text,
        failure,
    }
}

/// Run an extractor, turning a panic into a failure on the partial record.
pub(crate) fn run_isolated<E>(
    extractor: &E,
    text: &str,
    wrap: fn(E::Output) -> CustomsRecord,
) -> (CustomsRecord, Option<ExtractionError>)
where
    E: DocumentExtractor,
{
    let mut record = E::Output::default();
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        extractor.extract_into(text, &mut record);
    }));

    let failure = result.err().map(|payload| {
        let reason = panic_message(payload.as_ref());
        warn!(kind = %extractor.kind(), %reason, "extraction aborted");
        ExtractionError::Aborted {
            document: extractor.kind().to_string(),
            reason,
        }
    });

    (wrap(record), failure)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
