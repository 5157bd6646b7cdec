//! Comprobante de transacción (treasury payment receipt).

use lazy_static::lazy_static;

use super::common::{clp, date, digits, rut, upper, ANY_RUT};
use crate::extraction::cascade::Cascade;
use crate::extraction::DocumentExtractor;
use crate::models::document::DocumentKind;
use crate::models::records::ComprobanteTransaccion;

lazy_static! {
    static ref NUMERO_FOLIO: Cascade = Cascade::new("numero_folio", &[
        r"(?i)\bfolio\s*<NUM>?\s*:?\s*(\d{6,12})\b",
        r"(?i)\bf[o0]l[i1l][o0]\s*:?\s*(\d{6,12})\b",
        r"(?i)(?:n[uú]mero|<NUM>)\s*(?:de\s*)?(?:declaraci[oó]n|din|formulario)\s*:?\s*(\d{6,12})\b",
    ]).unwrap();

    static ref TOTAL_PAGADO: Cascade = Cascade::new("total_pagado", &[
        r"(?i)total\s*pagado\s*:?\s*\$?\s*<AMOUNT>",
        r"(?i)monto\s*(?:total\s*)?pagado\s*:?\s*\$?\s*<AMOUNT>",
        r"(?i)total\s*(?:a\s*)?pag(?:ar|o)\s*:?\s*\$?\s*<AMOUNT>",
        r"(?i)importe\s*(?:total)?\s*:?\s*\$?\s*<AMOUNT>",
        r"(?i)\btotal\s*:?\s*\$\s*<AMOUNT>",
    ]).unwrap();

    static ref FECHA_PAGO: Cascade = Cascade::new("fecha_pago", &[
        r"(?i)fecha\s*(?:de\s*)?pago\s*:?\s*<DATE>",
        r"(?i)fecha\s*(?:de\s*)?(?:la\s*)?transacci[oó]n\s*:?\s*<DATE>",
        r"(?i)fecha\s*:?\s*<DATE>",
    ]).unwrap();

    static ref HORA_PAGO: Cascade = Cascade::new("hora_pago", &[
        r"(?i)hora\s*(?:de\s*pago)?\s*:?\s*(\d{1,2}:\d{2}(?::\d{2})?)",
        r"\b(\d{1,2}:\d{2}:\d{2})\b",
    ]).unwrap();

    static ref RUT_PAGADOR: Cascade = Cascade::new("rut_pagador", &[
        r"(?i)rut\s*(?:del\s*)?(?:pagador|contribuyente|importador|cliente)\s*:?\s*<RUT>",
    ]).unwrap();

    static ref INSTITUCION: Cascade = Cascade::new("institucion", &[
        r"(?i)instituci[oó]n\s*(?:recaudadora|financiera)?\s*:?\s*(.+?)\s+(?:n\s?[°º]|nro\.?\s|n[uú]mero|operaci[oó]n|medio|total|fecha|hora|rut\b)",
        r"(?i)\b(banco\s+(?:de\s+)?[a-záéíóúñ]{3,}(?:\s+[a-záéíóúñ]{3,})?|bancoestado|servipag|caja\s+vecina|tesorer[ií]a\s+general(?:\s+de\s+la\s+rep[uú]blica)?)\b",
    ]).unwrap();

    static ref NUMERO_OPERACION: Cascade = Cascade::new("numero_operacion", &[
        r"(?i)<NUM>\s*(?:de\s*)?operaci[oó]n\s*:?\s*(\d{4,15})",
        r"(?i)(?:c[oó]digo|id)\s*(?:de\s*)?(?:transacci[oó]n|operaci[oó]n)\s*:?\s*([A-Z0-9-]{4,20})",
        r"(?i)operaci[oó]n\s*:?\s*(\d{4,15})",
    ]).unwrap();

    static ref MEDIO_PAGO: Cascade = Cascade::new("medio_pago", &[
        r"(?i)medio\s*(?:de\s*)?pago\s*:?\s*(.+?)(?:\s+(?:total|fecha|folio|rut\b|hora|monto|instituci)|$)",
        r"(?i)\b(cargo\s+en\s+cuenta|transferencia(?:\s+electr[oó]nica)?|pago\s+en\s+l[ií]nea|efectivo|tarjeta\s+de\s+(?:cr[eé]dito|d[eé]bito)|cheque)\b",
    ]).unwrap();
}

/// Extracts [`ComprobanteTransaccion`] records.
pub struct ComprobanteTransaccionExtractor;

impl ComprobanteTransaccionExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ComprobanteTransaccionExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor for ComprobanteTransaccionExtractor {
    type Output = ComprobanteTransaccion;

    fn kind(&self) -> DocumentKind {
        DocumentKind::ComprobanteTransaccion
    }

    fn extract_into(&self, text: &str, doc: &mut ComprobanteTransaccion) {
        doc.numero_folio = NUMERO_FOLIO.text(text, digits);
        doc.total_pagado = TOTAL_PAGADO.value(text, clp);
        doc.fecha_pago = FECHA_PAGO.value(text, date);
        doc.hora_pago = HORA_PAGO.text(text, digits);
        doc.rut_pagador = RUT_PAGADOR
            .find_map(text, rut)
            .or_else(|| ANY_RUT.find_map(text, rut))
            .map(|m| m.value)
            .unwrap_or_default();
        doc.institucion = INSTITUCION.text(text, upper);
        doc.numero_operacion = NUMERO_OPERACION.text(text, digits);
        doc.medio_pago = MEDIO_PAGO.text(text, upper);
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
    use std::str::FromStr;

    const RECEIPT: &str = "TESORERIA GENERAL DE LA REPUBLICA COMPROBANTE DE TRANSACCION \
        Folio 4560010758 Fecha de Pago 24-06-2025 Hora 10:35:12 RUT 76.123.456-0 \
        Institucion Recaudadora BANCO ESTADO N° Operacion 998877665 \
        Medio de Pago CARGO EN CUENTA Total Pagado 8.153.962";

    fn extract(text: &str) -> ComprobanteTransaccion {
        ComprobanteTransaccionExtractor::new().extract(text)
    }

    fn is_valid(doc: ComprobanteTransaccion) -> bool {
        validate(&CustomsRecord::ComprobanteTransaccion(doc)).valid
    }

    #[test]
    fn test_full_receipt() {
        let doc = extract(RECEIPT);

        assert_eq!(doc.numero_folio, "4560010758");
        assert_eq!(doc.total_pagado, Some(Decimal::from_str("8153962.00").unwrap()));
        assert_eq!(doc.fecha_pago, NaiveDate::from_ymd_opt(2025, 6, 24));
        assert_eq!(doc.hora_pago, "10:35:12");
        assert_eq!(doc.rut_pagador, "76.123.456-0");
        assert_eq!(doc.institucion, "BANCO ESTADO");
        assert_eq!(doc.numero_operacion, "998877665");
        assert_eq!(doc.medio_pago, "CARGO EN CUENTA");
        assert!(is_valid(doc));
    }

    #[test]
    fn test_minimal_receipt() {
        let doc = extract("Folio 4560010758 ... Total Pagado 8.153.962");
        assert_eq!(doc.numero_folio, "4560010758");
        assert_eq!(doc.total_pagado, Some(Decimal::new(815396200, 2)));
        assert!(is_valid(doc));
    }

    #[test]
    fn test_removing_critical_field_invalidates() {
        assert!(!is_valid(extract(&RECEIPT.replace("Folio 4560010758", ""))));
        assert!(!is_valid(extract(&RECEIPT.replace("Total Pagado 8.153.962", ""))));
    }

    #[test]
    fn test_ocr_confused_folio_label() {
        let doc = extract("F0LIO 4560010758 Total Pagado 1.000");
        assert_eq!(doc.numero_folio, "4560010758");
    }

    #[test]
    fn test_total_alternative_label() {
        let doc = extract("Folio 4560010758 Monto Pagado $ 527.300");
        assert_eq!(doc.total_pagado, Some(Decimal::new(52730000, 2)));
    }

    #[test]
    fn test_zero_total_is_not_valid() {
        let doc = extract("Folio 4560010758 Total Pagado 0");
        assert_eq!(doc.total_pagado, Some(Decimal::new(0, 2)));
        assert!(!is_valid(doc));
    }
}
