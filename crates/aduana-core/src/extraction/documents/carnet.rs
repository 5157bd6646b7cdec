//! Carnet aduanero (customs agent identity card).

use lazy_static::lazy_static;

use super::common::{compact, date, digits, name, rut, upper, ADUANA, CODIGO_AGENTE};
use crate::extraction::cascade::Cascade;
use crate::extraction::DocumentExtractor;
use crate::models::document::DocumentKind;
use crate::models::records::CarnetAduanero;

lazy_static! {
    static ref TITULO: Cascade = Cascade::new("titulo", &[
        r"(?i)\b(agente\s+de\s+aduanas?|apoderado\s+(?:especial|general)(?:\s+de\s+aduanas?)?|auxiliar\s+(?:de\s+)?(?:agente|despachador)(?:\s+de\s+aduanas?)?|despachador\s+de\s+aduanas?)\b",
        r"(?i)(?:t[ií]tulo|cargo|calidad)\s*:?\s*([a-záéíóúñ ]{5,40}?)\s+(?:nombre|rut|c[oó]digo)",
    ]).unwrap();

    static ref NOMBRE_COMPLETO: Cascade = Cascade::new("nombre_completo", &[
        r"(?i)nombre(?:\s*completo)?\s*:?\s*(.+?)\s+(?:rut|r\.u\.t|c[eé]dula|c[oó]digo|carn[eé]t|cargo|aduana|fecha)\b",
        r"(?i)(?:don|doña|sr\.?|sra\.?)\s+([a-záéíóúñ]+(?:\s+[a-záéíóúñ]+){1,4}?)\s+(?:rut|r\.u\.t|c[eé]dula)",
        r"(?i)(?:agente\s+de\s+aduanas?|apoderado\s+especial|auxiliar)\s+([a-záéíóúñ]+(?:\s+[a-záéíóúñ]+){1,4}?)\s+(?:rut|r\.u\.t)",
    ]).unwrap();

    static ref RUT: Cascade = Cascade::new("rut", &[
        r"(?i)\br\.?\s?u\.?\s?[tn]\.?\s*(?:<NUM>)?\s*:?\s*<RUT>",
        r"(?i)(?:c[eé]dula|c\.i\.)\s*(?:de\s*identidad)?\s*:?\s*<RUT>",
        r"<RUT>",
    ]).unwrap();

    static ref NUMERO_CARNET: Cascade = Cascade::new("numero_carnet", &[
        r"(?i)carn[eé]t\s*<NUM>\s*:?\s*(\d{3,10})\b",
        r"(?i)carn[eé]t\s*:?\s*(\d{3,10})\b",
        r"(?i)(?:credencial|identificaci[oó]n)\s*<NUM>?\s*:?\s*(\d{3,10})\b",
    ]).unwrap();

    static ref NUMERO_RESOLUCION: Cascade = Cascade::new("numero_resolucion", &[
        r"(?i)resoluci[oó]n\s*(?:exenta)?\s*<NUM>?\s*:?\s*(\d{1,6}(?:/\d{2,4})?)",
        r"(?i)\bres\.?\s*(?:ex\.?)?\s*<NUM>?\s*:?\s*(\d{1,6})\b",
    ]).unwrap();

    static ref FECHA_EMISION: Cascade = Cascade::new("fecha_emision", &[
        r"(?i)fecha\s*(?:de\s*)?(?:emisi[oó]n|otorgamiento|expedici[oó]n)\s*:?\s*<DATE>",
        r"(?i)(?:emitido|otorgado)\s*(?:el)?\s*:?\s*<DATE>",
        r"(?i)emisi[oó]n\s*:?\s*<DATE>",
    ]).unwrap();

    static ref FECHA_VENCIMIENTO: Cascade = Cascade::new("fecha_vencimiento", &[
        r"(?i)(?:fecha\s*(?:de\s*)?)?(?:vencimiento|expiraci[oó]n)\s*:?\s*<DATE>",
        r"(?i)v[aá]lid[oa]\s*hasta\s*:?\s*<DATE>",
        r"(?i)vence\s*:?\s*<DATE>",
    ]).unwrap();
}

/// Extracts [`CarnetAduanero`] records.
pub struct CarnetAduaneroExtractor;

impl CarnetAduaneroExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CarnetAduaneroExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor for CarnetAduaneroExtractor {
    type Output = CarnetAduanero;

    fn kind(&self) -> DocumentKind {
        DocumentKind::CarnetAduanero
    }

    fn extract_into(&self, text: &str, doc: &mut CarnetAduanero) {
        doc.titulo = TITULO.text(text, upper);
        doc.nombre_completo = NOMBRE_COMPLETO.text(text, name);
        doc.rut = RUT.text(text, rut);
        doc.numero_carnet = NUMERO_CARNET.text(text, digits);
        doc.codigo_agente = CODIGO_AGENTE.text(text, compact);
        doc.aduana = ADUANA.text(text, upper);
        doc.numero_resolucion = NUMERO_RESOLUCION.text(text, digits);
        doc.fecha_emision = FECHA_EMISION.value(text, date);
        doc.fecha_vencimiento = FECHA_VENCIMIENTO.value(text, date);
    }
}
