//! Documento de recepción (warehouse receipt).

use lazy_static::lazy_static;

use super::common::{
    clp, container, count, date, digits, reference, rut, upper, CONTENEDOR,
    DOCUMENTO_TRANSPORTE, NAVE, NUMERO_MANIFIESTO, OBSERVACIONES, VIAJE,
};
use crate::extraction::cascade::Cascade;
use crate::extraction::DocumentExtractor;
use crate::models::document::DocumentKind;
use crate::models::records::DocumentoRecepcion;

lazy_static! {
    static ref NUMERO_DOCUMENTO: Cascade = Cascade::new("numero_documento", &[
        r"(?i)documento\s*(?:de\s*)?recepci[oó]n\s*(?:electr[oó]nico)?\s*<NUM>?\s*:?\s*(\d[\d-]{3,18}\d)",
        r"(?i)\bd\.?\s?r\.?\s*<NUM>\s*:?\s*(\d[\d-]{3,18}\d)",
        r"(?i)recepci[oó]n\s*<NUM>\s*:?\s*(\d[\d-]{3,18}\d)",
        r"(?i)<NUM>\s*(?:de\s*)?(?:documento|dr)\s*:?\s*(\d[\d-]{3,18}\d)",
    ]).unwrap();

    static ref SITUACION: Cascade = Cascade::new("situacion", &[
        r"(?i)situaci[oó]n\s*(?:de\s*(?:la\s*)?(?:carga|recepci[oó]n))?\s*:?\s*(recibid[oa]\s+conforme|recibid[oa]\s+con\s+(?:observaciones|da[ñn]os?|faltantes?|sobrantes?)|con\s+observaciones|con\s+da[ñn]os?|conforme|en\s+dep[oó]sito|retirad[oa]|pendiente|rechazad[oa])",
        r"(?i)estado\s*(?:de\s*(?:la\s*)?carga)?\s*:\s*([a-záéíóúñ]+(?:\s+[a-záéíóúñ]+)?)",
        r"(?i)\b(recibid[oa]\s+conforme|recibid[oa]\s+con\s+observaciones|con\s+da[ñn]os?)\b",
    ]).unwrap();

    static ref FECHA_RECEPCION: Cascade = Cascade::new("fecha_recepcion", &[
        r"(?i)fecha\s*(?:de\s*)?(?:recepci[oó]n|ingreso|llegada)\s*:?\s*<DATE>",
        r"(?i)recibid[oa]\s*(?:el)?\s*:?\s*<DATE>",
        r"(?i)fecha\s*:?\s*<DATE>",
    ]).unwrap();

    static ref ALMACEN: Cascade = Cascade::new("almacen", &[
        r"(?i)(?:almac[eé]n|recinto|dep[oó]sito|terminal)\s*(?:extraportuario|de\s*dep[oó]sito)?\s*:\s*(.+?)\s+(?:r\.?\s?u\.?\s?t|fecha|direcci|manifiesto|c[oó]digo)",
    ]).unwrap();

    static ref RUT_ALMACEN: Cascade = Cascade::new("rut_almacen", &[
        r"(?i)(?:almac[eé]n|recinto|terminal).{0,80}?r\.?\s?u\.?\s?t\.?\s*:?\s*<RUT>",
    ]).unwrap();

    static ref CONSIGNATARIO: Cascade = Cascade::new("consignatario", &[
        r"(?i)(?:consignatario|consignee|importador)\s*:?\s*(.+?)\s+(?:r\.?\s?u\.?\s?t|nave|direcci|viaje|b/?l\b|contenedor)",
    ]).unwrap();

    static ref TIPO_BULTO: Cascade = Cascade::new("tipo_bulto", &[
        r"(?i)tipo\s*(?:de\s*)?bultos?\s*:?\s*([a-záéíóúñ]+)",
    ]).unwrap();

    static ref TOTAL_BULTOS: Cascade = Cascade::new("total_bultos", &[
        r"(?i)(?:cantidad|total|n[°º]|n[uú]mero)\s*(?:de\s*)?bultos\s*:?\s*(\d{1,3}(?:\.\d{3})+|\d+)\b",
        r"(?i)\bbultos\s*:?\s*(\d+)\b",
    ]).unwrap();

    static ref PESO_RECIBIDO: Cascade = Cascade::new("peso_recibido", &[
        r"(?i)peso\s*(?:recibido|bruto|total)?\s*(?:\(?kgs?\.?\)?)?\s*:?\s*<AMOUNT>",
    ]).unwrap();

    static ref FECHA_VENCIMIENTO: Cascade = Cascade::new("fecha_vencimiento", &[
        r"(?i)(?:vencimiento|t[eé]rmino)\s*(?:del?\s*)?(?:dep[oó]sito|almacenaje|plazo)?\s*:?\s*<DATE>",
        r"(?i)v[aá]lido\s*hasta\s*:?\s*<DATE>",
    ]).unwrap();
}

/// Extracts [`DocumentoRecepcion`] records.
pub struct DocumentoRecepcionExtractor;

impl DocumentoRecepcionExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocumentoRecepcionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor for DocumentoRecepcionExtractor {
    type Output = DocumentoRecepcion;

    fn kind(&self) -> DocumentKind {
        DocumentKind::DocumentoRecepcion
    }

    fn extract_into(&self, text: &str, doc: &mut DocumentoRecepcion) {
        doc.numero_documento = NUMERO_DOCUMENTO.text(text, digits);
        doc.situacion = SITUACION.text(text, upper);
        doc.numero_manifiesto = NUMERO_MANIFIESTO.text(text, digits);
        doc.fecha_recepcion = FECHA_RECEPCION.value(text, date);
        doc.almacen = ALMACEN.text(text, upper);
        doc.rut_almacen = RUT_ALMACEN.text(text, rut);
        doc.documento_transporte = DOCUMENTO_TRANSPORTE.text(text, reference);
        doc.consignatario = CONSIGNATARIO.text(text, upper);
        doc.nave = NAVE.text(text, upper);
        doc.viaje = VIAJE.text(text, upper);
        doc.contenedor = CONTENEDOR.text(text, container);
        doc.tipo_bulto = TIPO_BULTO.text(text, upper);
        doc.total_bultos = TOTAL_BULTOS.value(text, count);
        doc.peso_recibido = PESO_RECIBIDO.value(text, clp);
        doc.fecha_vencimiento = FECHA_VENCIMIENTO.value(text, date);
        doc.observaciones = OBSERVACIONES.text(text, upper);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::policy::validate;
    use crate::models::document::CustomsRecord;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    const RECEIPT: &str = "DOCUMENTO DE RECEPCION N° 2025-00123456 \
        ALMACEN: SAN ANTONIO TERMINAL INTERNACIONAL R.U.T.: 96.908.970-K \
        Fecha Recepcion: 23/06/2025 Manifiesto N° 245678 Situacion: RECIBIDO CONFORME \
        B/L: MAEU245678901 Consignatario: IMPORTADORA LOS ANDES SPA Nave: MAERSK SEMARANG \
        Viaje: 524W Contenedor: MSKU1234565 Tipo Bulto: CONTENEDOR Cantidad Bultos: 1 \
        Peso Recibido: 24.500,00 KG Vencimiento Deposito: 21/09/2025 \
        Observaciones: SIN OBSERVACIONES";

    fn extract(text: &str) -> DocumentoRecepcion {
        DocumentoRecepcionExtractor::new().extract(text)
    }

    fn is_valid(doc: DocumentoRecepcion) -> bool {
        validate(&CustomsRecord::DocumentoRecepcion(doc)).valid
    }

    #[test]
    fn test_full_receipt() {
        let doc = extract(RECEIPT);

        assert_eq!(doc.numero_documento, "2025-00123456");
        assert_eq!(doc.situacion, "RECIBIDO CONFORME");
        assert_eq!(doc.numero_manifiesto, "245678");
        assert_eq!(doc.fecha_recepcion, NaiveDate::from_ymd_opt(2025, 6, 23));
        assert_eq!(doc.almacen, "SAN ANTONIO TERMINAL INTERNACIONAL");
        assert_eq!(doc.rut_almacen, "96.908.970-K");
        assert_eq!(doc.documento_transporte, "MAEU245678901");
        assert_eq!(doc.consignatario, "IMPORTADORA LOS ANDES SPA");
        assert_eq!(doc.nave, "MAERSK SEMARANG");
        assert_eq!(doc.viaje, "524W");
        assert_eq!(doc.contenedor, "MSKU1234565");
        assert_eq!(doc.tipo_bulto, "CONTENEDOR");
        assert_eq!(doc.total_bultos, Some(1));
        assert_eq!(doc.peso_recibido, Some(Decimal::new(2450000, 2)));
        assert_eq!(doc.fecha_vencimiento, NaiveDate::from_ymd_opt(2025, 9, 21));
        assert_eq!(doc.observaciones, "SIN OBSERVACIONES");
        assert!(is_valid(doc));
    }

    #[test]
    fn test_removing_critical_fields_invalidates() {
        for removed in [
            "DOCUMENTO DE RECEPCION N° 2025-00123456",
            "Situacion: RECIBIDO CONFORME",
            "Manifiesto N° 245678",
        ] {
            let doc = extract(&RECEIPT.replace(removed, ""));
            assert!(!is_valid(doc), "still valid without {removed:?}");
        }
    }

    #[test]
    fn test_status_with_remarks() {
        let doc = extract("Situacion: CON OBSERVACIONES B/L: MAEU245678901");
        assert_eq!(doc.situacion, "CON OBSERVACIONES");
    }
}
