//! Declaración de ingreso (DIN, import declaration).

use lazy_static::lazy_static;

use super::common::{
    clp, compact, count, date, digits, name, reference, rut, upper, usd, ADUANA, ANY_RUT,
    CODIGO_AGENTE, DOCUMENTO_TRANSPORTE, FECHA_ACEPTACION, NUMERO_MANIFIESTO,
};
use crate::extraction::cascade::Cascade;
use crate::extraction::DocumentExtractor;
use crate::models::document::DocumentKind;
use crate::models::records::DeclaracionIngreso;

lazy_static! {
    static ref NUMERO_IDENTIFICACION: Cascade = Cascade::new("numero_identificacion", &[
        r"(?i)n[uú]mero\s*(?:de\s*)?identificaci[oó]n\s*:?\s*(\d{10}\s?-\s?[\dkK]|\d{10,11})\b",
        r"(?i)identificaci[oó]n\s*:?\s*(\d{10}\s?-\s?[\dkK]|\d{10,11})\b",
        r"(?i)<NUM>\s*(?:de\s*)?(?:din|declaraci[oó]n)\s*:?\s*(\d{10}\s?-\s?[\dkK]|\d{10,11})\b",
        r"(?i)\bdin\s*:?\s*(\d{10}\s?-\s?[\dkK]|\d{10,11})\b",
        r"\b(\d{10}-[\dkK])\b",
    ]).unwrap();

    static ref TIPO_OPERACION: Cascade = Cascade::new("tipo_operacion", &[
        r"(?i)tipo\s*(?:de\s*)?operaci[oó]n\s*:?\s*(.+?)\s+(?:agente|c[oó]digo|consignatario|importador|aduana|fecha|\d)",
        r"(?i)\b(importaci[oó]n\s+(?:control|ordinaria|anticipada|urgente)|admisi[oó]n\s+temporal|reingreso)\b",
    ]).unwrap();

    static ref NOMBRE_AGENTE: Cascade = Cascade::new("nombre_agente", &[
        r"(?i)agente\s*(?:de\s*aduanas?)?\s*:?\s*(?:[A-Z]\s?-?\s?\d{2,3}\s+)?(?:sr\.?\s+|don\s+)?([a-záéíóúñ]+(?:\s+[a-záéíóúñ]+){1,4}?)\s+(?:consignatario|importador|rut|r\.u\.t|c[oó]digo|nombre)",
        r"(?i)nombre\s*(?:del\s*)?(?:agente|despachador)\s*:?\s*(.+?)\s+(?:c[oó]digo|rut|consignatario)",
    ]).unwrap();

    static ref CONSIGNATARIO: Cascade = Cascade::new("consignatario", &[
        r"(?i)(?:consignatario|importador)\s*(?:nombre)?\s*:?\s*(.+?)\s+(?:r\.?\s?u\.?\s?t|direcci|pa[ií]s|domicilio)",
    ]).unwrap();

    static ref RUT_CONSIGNATARIO: Cascade = Cascade::new("rut_consignatario", &[
        r"(?i)(?:consignatario|importador).{0,80}?r\.?\s?u\.?\s?t\.?\s*:?\s*<RUT>",
    ]).unwrap();

    static ref PAIS_ORIGEN: Cascade = Cascade::new("pais_origen", &[
        r"(?i)pa[ií]s\s*(?:de\s*)?origen\s*:?\s*([a-záéíóúñ]+(?:\s+[a-záéíóúñ]+)?)\s+(?:puerto|pa[ií]s|v[ií]a|c[oó]d|\d)",
        r"(?i)origen\s*:?\s*([a-záéíóúñ]{3,})",
    ]).unwrap();

    static ref PUERTO_EMBARQUE: Cascade = Cascade::new("puerto_embarque", &[
        r"(?i)puerto\s*(?:de\s*)?embarque\s*:?\s*(.+?)\s+(?:puerto|pa[ií]s|v[ií]a|fecha|manifiesto|c[oó]d|\d)",
    ]).unwrap();

    static ref PUERTO_DESEMBARQUE: Cascade = Cascade::new("puerto_desembarque", &[
        r"(?i)puerto\s*(?:de\s*)?desembarque\s*:?\s*(.+?)\s+(?:v[ií]a|pa[ií]s|fecha|manifiesto|c[oó]d|documento|\d)",
    ]).unwrap();

    static ref VIA_TRANSPORTE: Cascade = Cascade::new("via_transporte", &[
        r"(?i)v[ií]a\s*(?:de\s*)?transporte\s*:?\s*(mar[ií]tima|a[eé]rea|terrestre|ferroviaria|postal|carretera|\S+)",
    ]).unwrap();

    static ref FECHA_DOCUMENTO_TRANSPORTE: Cascade = Cascade::new("fecha_documento_transporte", &[
        r"(?i)fecha\s*(?:de\s*)?doc(?:umento|\.)?\s*(?:de\s*)?transporte\s*:?\s*<DATE>",
        r"(?i)fecha\s*(?:de\s*)?(?:b/?l|conocimiento)\s*:?\s*<DATE>",
    ]).unwrap();

    static ref TOTAL_BULTOS: Cascade = Cascade::new("total_bultos", &[
        r"(?i)total\s*(?:de\s*)?bultos\s*:?\s*(\d{1,3}(?:\.\d{3})+|\d+)\b",
        r"(?i)(?:cantidad|n[°º])\s*(?:de\s*)?bultos\s*:?\s*(\d{1,3}(?:\.\d{3})+|\d+)\b",
    ]).unwrap();

    static ref PESO_BRUTO: Cascade = Cascade::new("peso_bruto", &[
        r"(?i)peso\s*bruto\s*(?:total)?\s*(?:\(?kgs?\.?\)?)?\s*:?\s*<AMOUNT>",
    ]).unwrap();

    static ref VALOR_FOB: Cascade = Cascade::new("valor_fob", &[
        r"(?i)(?:valor\s*)?\bfob\s*(?:us\$|usd)?\s*:?\s*<USD>",
    ]).unwrap();

    static ref VALOR_FLETE: Cascade = Cascade::new("valor_flete", &[
        r"(?i)(?:valor\s*)?\bflete\s*(?:us\$|usd)?\s*:?\s*<USD>",
    ]).unwrap();

    static ref VALOR_SEGURO: Cascade = Cascade::new("valor_seguro", &[
        r"(?i)(?:valor\s*)?\bseguro\s*(?:us\$|usd)?\s*:?\s*<USD>",
    ]).unwrap();

    static ref VALOR_CIF: Cascade = Cascade::new("valor_cif", &[
        r"(?i)(?:valor\s*)?\bcif\s*(?:us\$|usd)?\s*:?\s*<AMOUNT>",
    ]).unwrap();

    static ref TOTAL_A_PAGAR: Cascade = Cascade::new("total_a_pagar", &[
        r"(?i)total\s*(?:a\s*)?pagar\s*:?\s*\$?\s*<AMOUNT>",
        r"(?i)total\s*(?:giro|declaraci[oó]n)\s*:?\s*\$?\s*<AMOUNT>",
    ]).unwrap();

    static ref CODIGO_BARRAS: Cascade = Cascade::new("codigo_barras", &[
        r"(?i)c[oó]digo\s*(?:de\s*)?barras?\s*:?\s*(\d{26})\b",
        r"\b(\d{26})\b",
    ]).unwrap();
}

/// Extracts [`DeclaracionIngreso`] records.
pub struct DeclaracionIngresoExtractor;

impl DeclaracionIngresoExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DeclaracionIngresoExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor for DeclaracionIngresoExtractor {
    type Output = DeclaracionIngreso;

    fn kind(&self) -> DocumentKind {
        DocumentKind::DeclaracionIngreso
    }

    fn extract_into(&self, text: &str, doc: &mut DeclaracionIngreso) {
        doc.numero_identificacion = NUMERO_IDENTIFICACION.text(text, digits);
        doc.fecha_aceptacion = FECHA_ACEPTACION.value(text, date);
        doc.aduana = ADUANA.text(text, upper);
        doc.tipo_operacion = TIPO_OPERACION.text(text, upper);
        doc.codigo_agente = CODIGO_AGENTE.text(text, compact);
        doc.nombre_agente = NOMBRE_AGENTE.text(text, name);
        doc.consignatario = CONSIGNATARIO.text(text, upper);
        doc.rut_consignatario = RUT_CONSIGNATARIO
            .find_map(text, rut)
            .or_else(|| ANY_RUT.find_map(text, rut))
            .map(|m| m.value)
            .unwrap_or_default();
        doc.pais_origen = PAIS_ORIGEN.text(text, upper);
        doc.puerto_embarque = PUERTO_EMBARQUE.text(text, upper);
        doc.puerto_desembarque = PUERTO_DESEMBARQUE.text(text, upper);
        doc.via_transporte = VIA_TRANSPORTE.text(text, upper);
        doc.numero_manifiesto = NUMERO_MANIFIESTO.text(text, digits);
        doc.documento_transporte = DOCUMENTO_TRANSPORTE.text(text, reference);
        doc.fecha_documento_transporte = FECHA_DOCUMENTO_TRANSPORTE.value(text, date);
        doc.total_bultos = TOTAL_BULTOS.value(text, count);
        doc.peso_bruto = PESO_BRUTO.value(text, clp);
        doc.valor_fob = VALOR_FOB.value(text, usd);
        doc.valor_flete = VALOR_FLETE.value(text, usd);
        doc.valor_seguro = VALOR_SEGURO.value(text, usd);
        doc.valor_cif = VALOR_CIF.value(text, clp);
        doc.total_a_pagar = TOTAL_A_PAGAR.value(text, clp);
        doc.codigo_barras = CODIGO_BARRAS.text(text, digits);
    }
}
