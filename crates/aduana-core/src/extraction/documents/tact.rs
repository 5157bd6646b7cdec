//! TATC / ADC (título de admisión temporal de contenedores).
//!
//! Each shipping line prints the title number, container and seal under its
//! own labels, so those three fields use per-line rules. The rest of the
//! document shares one table.

use lazy_static::lazy_static;
use tracing::debug;

use super::common::{
    container, date, digits, reference, rut, upper, ANY_RUT, CONTENEDOR, DOCUMENTO_TRANSPORTE,
    NAVE, SELLO, VIAJE,
};
use crate::extraction::cascade::Cascade;
use crate::extraction::rules::patterns::{IAN_TAYLOR, MAERSK, MSC};
use crate::extraction::DocumentExtractor;
use crate::models::document::DocumentKind;
use crate::models::records::{TactAdc, TactFormat};

/// Identification rules for one shipping line.
struct LineRules {
    numero_tatc: Cascade,
    numero_contenedor: Cascade,
    numero_sello: Cascade,
}

lazy_static! {
    static ref MAERSK_RULES: LineRules = LineRules {
        numero_tatc: Cascade::new("numero_tatc", &[
            r"(?i)\btatc\s*(?:number|no\.?|<NUM>)?\s*:?\s*(\d[\d-]{6,18}\d)",
            r"(?i)t[ií]tulo\s*(?:de\s*)?admisi[oó]n.{0,60}?<NUM>\s*:?\s*(\d[\d-]{6,18}\d)",
        ]).unwrap(),
        numero_contenedor: Cascade::new("numero_contenedor", &[
            r"(?i)container\s*(?:no\.?|number|<NUM>)?\s*:?\s*<CONTAINER>",
            r"\b((?:MSKU|MAEU|MRKU|MRSU|SUDU|MSAU)\s?\d{6}\s?-?\s?\d)\b",
        ]).unwrap(),
        numero_sello: Cascade::new("numero_sello", &[
            r"(?i)\bseal\s*(?:no\.?|number|<NUM>)?\s*:?\s*([A-Z0-9][A-Z0-9-]{4,19})\b",
            r"\b(ML-?[A-Z]{2}\d{5,8})\b",
        ]).unwrap(),
    };

    static ref MSC_RULES: LineRules = LineRules {
        numero_tatc: Cascade::new("numero_tatc", &[
            r"(?i)\btatc\s*<NUM>?\s*:?\s*(\d{8,15})\b",
            r"(?i)admisi[oó]n\s*temporal\s*<NUM>?\s*:?\s*(\d{8,15})\b",
        ]).unwrap(),
        numero_contenedor: Cascade::new("numero_contenedor", &[
            r"(?i)contenedor\s*(?:<NUM>)?\s*:?\s*<CONTAINER>",
            r"\b((?:MSCU|MEDU|MSDU|MSMU)\s?\d{6}\s?-?\s?\d)\b",
        ]).unwrap(),
        numero_sello: Cascade::new("numero_sello", &[
            r"(?i)sellos?\s*(?:<NUM>)?\s*:?\s*([A-Z0-9][A-Z0-9-]{4,19})\b",
            r"\b([A-Z]{2}\d{6,9})\b",
        ]).unwrap(),
    };

    static ref IAN_TAYLOR_RULES: LineRules = LineRules {
        numero_tatc: Cascade::new("numero_tatc", &[
            r"(?i)\b(?:tatc|adc)\s*(?:/\s*adc)?\s*(?:<NUM>)?\s*:?\s*(\d{8,15})\b",
        ]).unwrap(),
        numero_contenedor: Cascade::new("numero_contenedor", &[
            r"(?i)(?:unidad|contenedor)\s*(?:<NUM>)?\s*:?\s*<CONTAINER>",
        ]).unwrap(),
        numero_sello: Cascade::new("numero_sello", &[
            r"(?i)(?:precinto|sello)\s*(?:<NUM>)?\s*:?\s*([A-Z0-9][A-Z0-9-]{4,19})\b",
        ]).unwrap(),
    };

    static ref GENERIC_TATC: Cascade = Cascade::new("numero_tatc", &[
        r"(?i)\b(?:tatc|adc)\s*(?:/\s*adc)?\s*(?:number|<NUM>)?\s*:?\s*(\d[\d-]{6,18}\d)",
        r"(?i)t[ií]tulo\s*(?:de\s*)?admisi[oó]n.{0,60}?<NUM>\s*:?\s*(\d[\d-]{6,18}\d)",
    ]).unwrap();

    static ref TIPO_CONTENEDOR: Cascade = Cascade::new("tipo_contenedor", &[
        r"(?i)(?:size\s*/\s*type|tipo(?:\s*(?:de\s*)?(?:unidad|contenedor))?|type)\s*:?\s*(\d{2}\s?'?\s?(?:DV|HC|HQ|GP|RF|RH|OT|FR|TK|DC|ST))\b",
        r"\b((?:20|40|45)\s?'?\s?(?:DV|HC|HQ|GP|RF|RH|OT|FR|TK|DC|ST))\b",
    ]).unwrap();

    static ref FECHA_EMISION: Cascade = Cascade::new("fecha_emision", &[
        r"(?i)(?:issue\s*date|fecha\s*(?:de\s*)?emisi[oó]n|emitido)\s*:?\s*<DATE>",
        r"(?i)\bdate\s*:?\s*<DATE>",
    ]).unwrap();

    static ref FECHA_VENCIMIENTO: Cascade = Cascade::new("fecha_vencimiento", &[
        r"(?i)(?:expiry\s*date|expiration|fecha\s*(?:de\s*)?(?:vencimiento|t[eé]rmino)|v[aá]lido\s*hasta|vence)\s*:?\s*<DATE>",
    ]).unwrap();

    static ref PUERTO: Cascade = Cascade::new("puerto", &[
        r"(?i)\b(?:port|puerto)\s*(?:of\s*discharge|de\s*(?:descarga|ingreso|desembarque))?\s*:?\s*(.+?)\s+(?:b/?l|bill|issue|fecha|date|consignee|consignatario|vessel|nave|documento)\b",
    ]).unwrap();

    static ref CONSIGNATARIO: Cascade = Cascade::new("consignatario", &[
        r"(?i)(?:consignee|consignatario)\s*:?\s*(.+?)\s+(?:r\.?\s?u\.?\s?t|tax\s*id|address|direcci)",
    ]).unwrap();

    static ref RUT_CONSIGNATARIO: Cascade = Cascade::new("rut_consignatario", &[
        r"(?i)(?:consignee|consignatario).{0,80}?r\.?\s?u\.?\s?t\.?\s*:?\s*<RUT>",
    ]).unwrap();
}

/// Identify the shipping line from the letterhead.
///
/// Ian Taylor is checked first: as an agency it may print the represented
/// line's vessel names (`MSC ANNA`) on its own documents.
pub fn detect_format(text: &str) -> TactFormat {
    if IAN_TAYLOR.is_match(text) {
        TactFormat::IanTaylor
    } else if MAERSK.is_match(text) {
        TactFormat::Maersk
    } else if MSC.is_match(text) {
        TactFormat::Msc
    } else {
        TactFormat::Unknown
    }
}

fn line_rules(format: TactFormat) -> Option<&'static LineRules> {
    match format {
        TactFormat::Maersk => Some(&MAERSK_RULES),
        TactFormat::Msc => Some(&MSC_RULES),
        TactFormat::IanTaylor => Some(&IAN_TAYLOR_RULES),
        TactFormat::Unknown => None,
    }
}

/// Extracts [`TactAdc`] records.
pub struct TactAdcExtractor;

impl TactAdcExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TactAdcExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor for TactAdcExtractor {
    type Output = TactAdc;

    fn kind(&self) -> DocumentKind {
        DocumentKind::TactAdc
    }

    fn extract_into(&self, text: &str, doc: &mut TactAdc) {
        doc.naviera = detect_format(text);
        debug!(naviera = ?doc.naviera, "TATC shipping line");

        match line_rules(doc.naviera) {
            Some(rules) => {
                doc.numero_tatc = rules.numero_tatc.text(text, digits);
                doc.numero_contenedor = rules.numero_contenedor.text(text, container);
                doc.numero_sello = rules.numero_sello.text(text, upper);
            }
            None => {
                doc.numero_tatc = GENERIC_TATC.text(text, digits);
                doc.numero_contenedor = CONTENEDOR.text(text, container);
                doc.numero_sello = SELLO.text(text, upper);
            }
        }

        doc.tipo_contenedor = TIPO_CONTENEDOR
            .value(text, |v| upper(&v.replace(|c: char| c == ' ' || c == '\'', "")))
            .unwrap_or_default();
        doc.fecha_emision = FECHA_EMISION.value(text, date);
        doc.fecha_vencimiento = FECHA_VENCIMIENTO.value(text, date);
        doc.nave = NAVE.text(text, upper);
        doc.viaje = VIAJE.text(text, upper);
        doc.puerto = PUERTO.text(text, upper);
        doc.documento_transporte = DOCUMENTO_TRANSPORTE.text(text, reference);
        doc.consignatario = CONSIGNATARIO.text(text, upper);
        doc.rut_consignatario = RUT_CONSIGNATARIO
            .find_map(text, rut)
            .or_else(|| ANY_RUT.find_map(text, rut))
            .map(|m| m.value)
            .unwrap_or_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::policy::validate;
    use crate::models::document::CustomsRecord;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    const MAERSK_TATC: &str = "MAERSK CHILE S.A. TITULO DE ADMISION TEMPORAL DE CONTENEDORES \
        TATC Number: 2025-140-0012345 Container No: MSKU1234565 Size/Type: 40HC \
        Seal No: ML-CL7654321 Vessel: MAERSK SEMARANG Voyage: 524W Port: SAN ANTONIO \
        B/L No: MAEU245678901 Issue Date: 20-06-2025 Expiry Date: 18-09-2025 \
        Consignee: IMPORTADORA LOS ANDES SPA RUT: 76.123.456-0";

    const MSC_TATC: &str = "MEDITERRANEAN SHIPPING COMPANY MSC CHILE S.A. TATC N° 2025140054321 \
        Contenedor: MSCU1234566 Tipo: 20DV Sello: FJ9988776 Nave: MSC ANNA Viaje: FA521R \
        Puerto de Ingreso: VALPARAISO BL: MEDUA1234567 Fecha Emision: 21/06/2025 \
        Fecha Vencimiento: 19/09/2025 Consignatario: COMERCIAL PACIFICO LTDA RUT 77.888.999-1";

    const IAN_TAYLOR_TATC: &str = "IAN TAYLOR CHILE S.A. AGENTES MARITIMOS \
        TATC / ADC Numero: 14025000789 Unidad: HLXU8765432 Precinto: HL1234567 \
        Tipo Unidad: 40DV Nave: CAP SAN MARCO Viaje: 2421E Puerto: SAN ANTONIO \
        Documento de Transporte: HLCUSCL250612345 Fecha Emision: 22.06.2025 \
        Fecha Termino: 20.09.2025 Consignatario: IMPORTADORA LOS ANDES SPA R.U.T.: 76.123.456-0";

    fn extract(text: &str) -> TactAdc {
        TactAdcExtractor::new().extract(text)
    }

    fn is_valid(doc: TactAdc) -> bool {
        validate(&CustomsRecord::TactAdc(doc)).valid
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(detect_format(MAERSK_TATC), TactFormat::Maersk);
        assert_eq!(detect_format(MSC_TATC), TactFormat::Msc);
        assert_eq!(detect_format(IAN_TAYLOR_TATC), TactFormat::IanTaylor);
        assert_eq!(detect_format("TATC 12345678"), TactFormat::Unknown);
    }

    #[test]
    fn test_maersk() {
        let doc = extract(MAERSK_TATC);

        assert_eq!(doc.naviera, TactFormat::Maersk);
        assert_eq!(doc.numero_tatc, "2025-140-0012345");
        assert_eq!(doc.numero_contenedor, "MSKU1234565");
        assert_eq!(doc.numero_sello, "ML-CL7654321");
        assert_eq!(doc.tipo_contenedor, "40HC");
        assert_eq!(doc.nave, "MAERSK SEMARANG");
        assert_eq!(doc.viaje, "524W");
        assert_eq!(doc.puerto, "SAN ANTONIO");
        assert_eq!(doc.documento_transporte, "MAEU245678901");
        assert_eq!(doc.fecha_emision, NaiveDate::from_ymd_opt(2025, 6, 20));
        assert_eq!(doc.fecha_vencimiento, NaiveDate::from_ymd_opt(2025, 9, 18));
        assert_eq!(doc.consignatario, "IMPORTADORA LOS ANDES SPA");
        assert_eq!(doc.rut_consignatario, "76.123.456-0");
        assert!(is_valid(doc));
    }

    #[test]
    fn test_msc() {
        let doc = extract(MSC_TATC);

        assert_eq!(doc.naviera, TactFormat::Msc);
        assert_eq!(doc.numero_tatc, "2025140054321");
        assert_eq!(doc.numero_contenedor, "MSCU1234566");
        assert_eq!(doc.numero_sello, "FJ9988776");
        assert_eq!(doc.tipo_contenedor, "20DV");
        assert_eq!(doc.nave, "MSC ANNA");
        assert_eq!(doc.viaje, "FA521R");
        assert_eq!(doc.puerto, "VALPARAISO");
        assert_eq!(doc.documento_transporte, "MEDUA1234567");
        assert_eq!(doc.fecha_emision, NaiveDate::from_ymd_opt(2025, 6, 21));
        assert_eq!(doc.fecha_vencimiento, NaiveDate::from_ymd_opt(2025, 9, 19));
        assert_eq!(doc.rut_consignatario, "77.888.999-1");
        assert!(is_valid(doc));
    }

    #[test]
    fn test_ian_taylor() {
        let doc = extract(IAN_TAYLOR_TATC);

        assert_eq!(doc.naviera, TactFormat::IanTaylor);
        assert_eq!(doc.numero_tatc, "14025000789");
        assert_eq!(doc.numero_contenedor, "HLXU8765432");
        assert_eq!(doc.numero_sello, "HL1234567");
        assert_eq!(doc.tipo_contenedor, "40DV");
        assert_eq!(doc.nave, "CAP SAN MARCO");
        assert_eq!(doc.puerto, "SAN ANTONIO");
        assert_eq!(doc.documento_transporte, "HLCUSCL250612345");
        assert_eq!(doc.fecha_emision, NaiveDate::from_ymd_opt(2025, 6, 22));
        assert_eq!(doc.fecha_vencimiento, NaiveDate::from_ymd_opt(2025, 9, 20));
        assert!(is_valid(doc));
    }

    #[test]
    fn test_missing_seal_is_invalid() {
        let doc = extract(&MAERSK_TATC.replace("Seal No: ML-CL7654321 ", ""));
        assert_eq!(doc.numero_sello, "");
        let validity = validate(&CustomsRecord::TactAdc(doc));
        assert_eq!(validity.missing, vec!["numero_sello"]);
    }

    #[test]
    fn test_unknown_line_uses_generic_rules() {
        let doc = extract("TATC N° 88776655 Contenedor: TGHU7654321 Sello: AB123456");
        assert_eq!(doc.naviera, TactFormat::Unknown);
        assert_eq!(doc.numero_tatc, "88776655");
        assert_eq!(doc.numero_contenedor, "TGHU7654321");
        assert_eq!(doc.numero_sello, "AB123456");
    }

    #[test]
    fn test_removing_tatc_number_invalidates() {
        for (text, number) in [
            (MAERSK_TATC, "TATC Number: 2025-140-0012345 "),
            (MSC_TATC, "TATC N° 2025140054321 "),
            (IAN_TAYLOR_TATC, "TATC / ADC Numero: 14025000789 "),
        ] {
            let doc = extract(&text.replace(number, ""));
            assert_eq!(doc.numero_tatc, "");
            let validity = validate(&CustomsRecord::TactAdc(doc));
            assert_eq!(validity.missing, vec!["numero_tatc"]);
        }
    }

    #[test]
    fn test_removing_container_invalidates() {
        for (text, container) in [
            (MAERSK_TATC, "Container No: MSKU1234565 "),
            (MSC_TATC, "Contenedor: MSCU1234566 "),
            (IAN_TAYLOR_TATC, "Unidad: HLXU8765432 "),
        ] {
            let doc = extract(&text.replace(container, ""));
            assert_eq!(doc.numero_contenedor, "");
            let validity = validate(&CustomsRecord::TactAdc(doc));
            assert_eq!(validity.missing, vec!["numero_contenedor"]);
        }
    }
}
