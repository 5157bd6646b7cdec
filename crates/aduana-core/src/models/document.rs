//! Extracted document envelope shared by every document type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ExtractionError;

use super::records::*;

/// The seven supported customs document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    CarnetAduanero,
    DeclaracionIngreso,
    DocumentoRecepcion,
    GuiaDespacho,
    ComprobanteTransaccion,
    SeleccionAforo,
    TactAdc,
}

impl DocumentKind {
    /// All document kinds in declaration order.
    pub const ALL: [DocumentKind; 7] = [
        DocumentKind::CarnetAduanero,
        DocumentKind::DeclaracionIngreso,
        DocumentKind::DocumentoRecepcion,
        DocumentKind::GuiaDespacho,
        DocumentKind::ComprobanteTransaccion,
        DocumentKind::SeleccionAforo,
        DocumentKind::TactAdc,
    ];

    /// Kebab-case name used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::CarnetAduanero => "carnet-aduanero",
            DocumentKind::DeclaracionIngreso => "declaracion-ingreso",
            DocumentKind::DocumentoRecepcion => "documento-recepcion",
            DocumentKind::GuiaDespacho => "guia-despacho",
            DocumentKind::ComprobanteTransaccion => "comprobante-transaccion",
            DocumentKind::SeleccionAforo => "seleccion-aforo",
            DocumentKind::TactAdc => "tact-adc",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKind {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace('_', "-");
        let kind = match key.as_str() {
            "carnet-aduanero" | "carnet" => DocumentKind::CarnetAduanero,
            "declaracion-ingreso" | "din" => DocumentKind::DeclaracionIngreso,
            "documento-recepcion" | "dr" => DocumentKind::DocumentoRecepcion,
            "guia-despacho" | "guia" => DocumentKind::GuiaDespacho,
            "comprobante-transaccion" | "comprobante" => DocumentKind::ComprobanteTransaccion,
            "seleccion-aforo" | "aforo" => DocumentKind::SeleccionAforo,
            "tact-adc" | "tatc" | "tact" => DocumentKind::TactAdc,
            _ => return Err(ExtractionError::UnknownDocumentKind(s.to_string())),
        };
        Ok(kind)
    }
}

/// Record of any document type, tagged with its type on serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "document_type", rename_all = "snake_case")]
pub enum CustomsRecord {
    CarnetAduanero(CarnetAduanero),
    DeclaracionIngreso(DeclaracionIngreso),
    DocumentoRecepcion(DocumentoRecepcion),
    GuiaDespacho(GuiaDespacho),
    ComprobanteTransaccion(ComprobanteTransaccion),
    SeleccionAforo(SeleccionAforo),
    TactAdc(TactAdc),
}

impl CustomsRecord {
    /// An all-default record of the given kind.
    pub fn empty(kind: DocumentKind) -> Self {
        match kind {
            DocumentKind::CarnetAduanero => Self::CarnetAduanero(Default::default()),
            DocumentKind::DeclaracionIngreso => Self::DeclaracionIngreso(Default::default()),
            DocumentKind::DocumentoRecepcion => Self::DocumentoRecepcion(Default::default()),
            DocumentKind::GuiaDespacho => Self::GuiaDespacho(Default::default()),
            DocumentKind::ComprobanteTransaccion => {
                Self::ComprobanteTransaccion(Default::default())
            }
            DocumentKind::SeleccionAforo => Self::SeleccionAforo(Default::default()),
            DocumentKind::TactAdc => Self::TactAdc(Default::default()),
        }
    }

    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::CarnetAduanero(_) => DocumentKind::CarnetAduanero,
            Self::DeclaracionIngreso(_) => DocumentKind::DeclaracionIngreso,
            Self::DocumentoRecepcion(_) => DocumentKind::DocumentoRecepcion,
            Self::GuiaDespacho(_) => DocumentKind::GuiaDespacho,
            Self::ComprobanteTransaccion(_) => DocumentKind::ComprobanteTransaccion,
            Self::SeleccionAforo(_) => DocumentKind::SeleccionAforo,
            Self::TactAdc(_) => DocumentKind::TactAdc,
        }
    }

    /// Critical field names paired with whether each one was extracted.
    pub fn critical_fields(&self) -> Vec<(&'static str, bool)> {
        match self {
            Self::CarnetAduanero(r) => r.critical_fields(),
            Self::DeclaracionIngreso(r) => r.critical_fields(),
            Self::DocumentoRecepcion(r) => r.critical_fields(),
            Self::GuiaDespacho(r) => r.critical_fields(),
            Self::ComprobanteTransaccion(r) => r.critical_fields(),
            Self::SeleccionAforo(r) => r.critical_fields(),
            Self::TactAdc(r) => r.critical_fields(),
        }
    }

    /// Fill blank fields from another record of the same kind.
    ///
    /// Returns `false` (and changes nothing) when the kinds differ.
    pub fn fill_missing(&mut self, other: &CustomsRecord) -> bool {
        match (self, other) {
            (Self::CarnetAduanero(a), Self::CarnetAduanero(b)) => a.fill_missing(b),
            (Self::DeclaracionIngreso(a), Self::DeclaracionIngreso(b)) => a.fill_missing(b),
            (Self::DocumentoRecepcion(a), Self::DocumentoRecepcion(b)) => a.fill_missing(b),
            (Self::GuiaDespacho(a), Self::GuiaDespacho(b)) => a.fill_missing(b),
            (Self::ComprobanteTransaccion(a), Self::ComprobanteTransaccion(b)) => {
                a.fill_missing(b)
            }
            (Self::SeleccionAforo(a), Self::SeleccionAforo(b)) => a.fill_missing(b),
            (Self::TactAdc(a), Self::TactAdc(b)) => a.fill_missing(b),
            _ => return false,
        }
        true
    }
}

/// How the text behind a document was obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Image sent through an OCR gateway, then rule extraction.
    ImageOcr,
    /// Text supplied directly, rule extraction only.
    #[default]
    Text,
}

impl ExtractionMethod {
    pub fn label(&self) -> &'static str {
        match self {
            ExtractionMethod::ImageOcr => "OCR + rule extraction",
            ExtractionMethod::Text => "rule extraction",
        }
    }
}

/// Metadata attached to every extracted document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Source file name (empty for inline text).
    pub file_name: String,

    /// Hex SHA-256 of the source bytes (empty for inline text).
    pub content_hash: String,

    pub extraction_method: ExtractionMethod,

    /// Normalized OCR text the fields were extracted from.
    pub raw_text: String,

    /// Fixed confidence for the pipeline that produced the document.
    pub confidence: f32,

    /// Explanation of a failed or partial extraction.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comments: String,

    /// All critical fields were extracted.
    pub valid: bool,

    /// Critical fields that could not be extracted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<String>,

    /// Number of scanned pages merged into this document.
    pub page_count: usize,
}

/// A record together with its extraction metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub record: CustomsRecord,
    pub metadata: DocumentMetadata,
}

impl ExtractedDocument {
    pub fn kind(&self) -> DocumentKind {
        self.record.kind()
    }

    pub fn is_valid(&self) -> bool {
        self.metadata.valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trip() {
        for kind in DocumentKind::ALL {
            assert_eq!(kind.as_str().parse::<DocumentKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_kind_aliases() {
        assert_eq!("DIN".parse::<DocumentKind>().unwrap(), DocumentKind::DeclaracionIngreso);
        assert_eq!("tatc".parse::<DocumentKind>().unwrap(), DocumentKind::TactAdc);
        assert_eq!(
            "guia_despacho".parse::<DocumentKind>().unwrap(),
            DocumentKind::GuiaDespacho
        );
        assert!("factura".parse::<DocumentKind>().is_err());
    }

    #[test]
    fn test_record_serializes_with_tag() {
        let record = CustomsRecord::empty(DocumentKind::TactAdc);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["document_type"], "tact_adc");
        assert_eq!(json["naviera"], "unknown");
    }

    #[test]
    fn test_fill_missing_rejects_other_kind() {
        let mut carnet = CustomsRecord::empty(DocumentKind::CarnetAduanero);
        let guia = CustomsRecord::empty(DocumentKind::GuiaDespacho);
        assert!(!carnet.fill_missing(&guia));
    }
}
