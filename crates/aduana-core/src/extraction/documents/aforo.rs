//! Selección de aforo (inspection channel notice).

use lazy_static::lazy_static;

use super::common::{
    compact, date, digits, name, reference, rut, upper, ADUANA, ANY_RUT, CODIGO_AGENTE,
    DOCUMENTO_TRANSPORTE, FECHA_ACEPTACION, NUMERO_MANIFIESTO, OBSERVACIONES,
};
use crate::extraction::cascade::Cascade;
use crate::extraction::DocumentExtractor;
use crate::models::document::DocumentKind;
use crate::models::records::SeleccionAforo;

lazy_static! {
    static ref NUMERO_DIN: Cascade = Cascade::new("numero_din", &[
        r"(?i)\bdin\s*<NUM>?\s*:?\s*(\d{10}(?:\s?-\s?[\dkK])?)\b",
        r"(?i)n[uú]mero\s*(?:de\s*)?(?:identificaci[oó]n|declaraci[oó]n)\s*:?\s*(\d{10}(?:\s?-\s?[\dkK])?)\b",
        r"(?i)declaraci[oó]n\s*(?:de\s*ingreso)?\s*<NUM>?\s*:?\s*(\d{10}(?:\s?-\s?[\dkK])?)\b",
        r"\b(\d{10})\b",
    ]).unwrap();

    // Only the known channel names; free text after the label is not trusted.
    static ref TIPO_REVISION: Cascade = Cascade::new("tipo_revision", &[
        r"(?i)tipo\s*(?:de\s*)?(?:revisi[oó]n|aforo|selecci[oó]n)\s*:?\s*(aforo\s+f[ií]sico(?:\s+completo)?|aforo\s+documental|revisi[oó]n\s+(?:documental|f[ií]sica)|sin\s+(?:aforo|revisi[oó]n)|f[ií]sico|documental)\b",
        r"(?i)\b(aforo\s+f[ií]sico|aforo\s+documental|sin\s+aforo)\b",
        r"(?i)seleccionad[oa]\s+(?:para|a)\s+(aforo\s+f[ií]sico|aforo\s+documental|revisi[oó]n\s+documental)",
    ]).unwrap();

    static ref NOMBRE_AGENTE: Cascade = Cascade::new("nombre_agente", &[
        r"(?i)agente\s*(?:de\s*aduanas?)?\s*:?\s*(?:[A-Z]\s?-?\s?\d{2,3}\s*-?\s*)?(?:sr\.?\s+|don\s+)?([a-záéíóúñ]+(?:\s+[a-záéíóúñ]+){1,4}?)\s+(?:importador|consignatario|rut|r\.u\.t|c[oó]digo|manifiesto|fecha)\b",
        r"(?i)nombre\s*(?:del\s*)?(?:agente|despachador)\s*:?\s*(.+?)\s+(?:c[oó]digo|rut|importador)",
    ]).unwrap();

    static ref FECHA_SELECCION: Cascade = Cascade::new("fecha_seleccion", &[
        r"(?i)fecha\s*(?:de\s*)?selecci[oó]n\s*:?\s*<DATE>",
        r"(?i)seleccionad[oa]\s*(?:el)?\s*:?\s*<DATE>",
    ]).unwrap();

    static ref IMPORTADOR: Cascade = Cascade::new("importador", &[
        r"(?i)(?:importador|consignatario)\s*:?\s*(.+?)\s+(?:r\.?\s?u\.?\s?t|direcci|manifiesto|domicilio)",
    ]).unwrap();

    static ref RUT_IMPORTADOR: Cascade = Cascade::new("rut_importador", &[
        r"(?i)(?:importador|consignatario).{0,80}?r\.?\s?u\.?\s?t\.?\s*:?\s*<RUT>",
    ]).unwrap();
}

/// Extracts [`SeleccionAforo`] records.
pub struct SeleccionAforoExtractor;

impl SeleccionAforoExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SeleccionAforoExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor for SeleccionAforoExtractor {
    type Output = SeleccionAforo;

    fn kind(&self) -> DocumentKind {
        DocumentKind::SeleccionAforo
    }

    fn extract_into(&self, text: &str, doc: &mut SeleccionAforo) {
        doc.numero_din = NUMERO_DIN.text(text, digits);
        doc.tipo_revision = TIPO_REVISION.text(text, upper);
        doc.nombre_agente = NOMBRE_AGENTE.text(text, name);
        doc.codigo_agente = CODIGO_AGENTE.text(text, compact);
        doc.fecha_seleccion = FECHA_SELECCION.value(text, date);
        doc.fecha_aceptacion = FECHA_ACEPTACION.value(text, date);
        doc.aduana = ADUANA.text(text, upper);
        doc.importador = IMPORTADOR.text(text, upper);
        doc.rut_importador = RUT_IMPORTADOR
            .find_map(text, rut)
            .or_else(|| ANY_RUT.find_map(text, rut))
            .map(|m| m.value)
            .unwrap_or_default();
        doc.numero_manifiesto = NUMERO_MANIFIESTO.text(text, digits);
        doc.documento_transporte = DOCUMENTO_TRANSPORTE.text(text, reference);
        doc.observaciones = OBSERVACIONES.text(text, upper);
    }
}
