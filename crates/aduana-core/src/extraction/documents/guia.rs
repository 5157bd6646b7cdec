//! Guía de despacho (dispatch guide).
//!
//! Guides come with different letterheads. The issuer is detected first and
//! only that issuer's rules run for the header fields (number, issuer RUT,
//! date, parties); the body fields share one table.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::common::{
    clp, compact, container, date, digits, name, reference, rut, upper, CONTENEDOR,
    DOCUMENTO_TRANSPORTE, SELLO,
};
use crate::extraction::cascade::Cascade;
use crate::extraction::rules::patterns::{ALBERTO_RUBIO, JORGE_STEIN};
use crate::extraction::DocumentExtractor;
use crate::models::document::DocumentKind;
use crate::models::records::{GuiaDespacho, GuiaFormat};

/// Header rules for one letterhead.
struct HeaderRules {
    numero_guia: Cascade,
    rut_emisor: Cascade,
    fecha_documento: Cascade,
    razon_social_emisor: Cascade,
    razon_social_receptor: Cascade,
    rut_receptor: Cascade,
}

lazy_static! {
    /// Start of the receiver or transport block; the issuer's data comes before it.
    static ref HEADER_END: Regex = Regex::new(
        r"(?i)\b(?:se[ñn]or|destinatario|cliente|chofer|conductor)"
    ).unwrap();

    static ref JORGE_STEIN_RULES: HeaderRules = HeaderRules {
        numero_guia: Cascade::new("numero_guia", &[
            r"(?i)gu[ií]a\s*de\s*despacho(?:\s*electr[oó]nica)?\s*<NUM>\s*:?\s*(\d{6,10})\b",
            r"(?i)\bno\.?\s*(\d{10})\b",
            r"(?i)<NUM>\s*:?\s*(0\d{9})\b",
        ]).unwrap(),
        rut_emisor: Cascade::new("rut_emisor", &[
            r"(?i)jorge\s*stein.{0,40}?r\.?\s?u\.?\s?t\.?\s*:?\s*<RUT>",
            r"(?i)\br\.?\s?u\.?\s?t\.?\s*:?\s*<RUT>",
        ]).unwrap(),
        fecha_documento: Cascade::new("fecha_documento", &[
            r"(?i)fecha\s*(?:de\s*)?emisi[oó]n\s*:?\s*(\d{1,2}-\d{1,2}-\d{4})",
            r"(?i)fecha\s*:?\s*<DATE>",
            r"\b(\d{2}-\d{2}-\d{4})\b",
        ]).unwrap(),
        razon_social_emisor: Cascade::new("razon_social_emisor", &[
            r"(?i)(agencia\s+de\s+aduanas?\s+jorge\s+stein(?:\s+y\s+c[ií]a\.?)?(?:\s+ltda\.?)?)",
            r"(?i)(jorge\s*stein)",
        ]).unwrap(),
        razon_social_receptor: Cascade::new("razon_social_receptor", &[
            r"(?i)se[ñn]or(?:\(?es\)?)?\s*:?\s*(.+?)\s+(?:r\.?\s?u\.?\s?t|giro|direcci)",
        ]).unwrap(),
        rut_receptor: Cascade::new("rut_receptor", &[
            r"(?i)se[ñn]or(?:\(?es\)?)?\s*:?\s*.+?r\.?\s?u\.?\s?t\.?\s*:?\s*<RUT>",
        ]).unwrap(),
    };

    static ref ALBERTO_RUBIO_RULES: HeaderRules = HeaderRules {
        numero_guia: Cascade::new("numero_guia", &[
            r"(?i)gu[ií]a\s*de\s*despacho(?:\s*electr[oó]nica)?\s*<NUM>?\s*:?\s*(\d{3,8})\b",
            r"(?i)n\s?[°º]\s*(\d{3,8})\b",
            r"(?i)folio\s*:?\s*(\d{3,8})\b",
        ]).unwrap(),
        rut_emisor: Cascade::new("rut_emisor", &[
            r"(?i)alberto\s*rubio.{0,60}?r\.?\s?u\.?\s?t\.?\s*:?\s*<RUT>",
            r"(?i)\br\.?\s?u\.?\s?t\.?\s*:?\s*<RUT>",
        ]).unwrap(),
        fecha_documento: Cascade::new("fecha_documento", &[
            r"(?i)(\d{1,2}\s*de\s+[a-záéíóú]{3,10}\s*(?:de|del)\s*\d{4})",
            r"(?i)fecha\s*(?:de\s*)?(?:emisi[oó]n)?\s*:?\s*<DATE>",
            r"<DATE>",
        ]).unwrap(),
        razon_social_emisor: Cascade::new("razon_social_emisor", &[
            r"(?i)(alberto\s+rubio(?:\s+y\s+c[ií]a\.?)?(?:\s+ltda\.?)?)",
        ]).unwrap(),
        razon_social_receptor: Cascade::new("razon_social_receptor", &[
            r"(?i)destinatario\s*:?\s*(.+?)\s+(?:r\.?\s?u\.?\s?t|direcci|giro)",
            r"(?i)se[ñn]or(?:\(?es\)?)?\s*:?\s*(.+?)\s+(?:r\.?\s?u\.?\s?t|giro|direcci)",
        ]).unwrap(),
        rut_receptor: Cascade::new("rut_receptor", &[
            r"(?i)destinatario\s*:?\s*.+?r\.?\s?u\.?\s?t\.?\s*:?\s*<RUT>",
            r"(?i)se[ñn]or(?:\(?es\)?)?\s*:?\s*.+?r\.?\s?u\.?\s?t\.?\s*:?\s*<RUT>",
        ]).unwrap(),
    };

    static ref GENERIC_RULES: HeaderRules = HeaderRules {
        numero_guia: Cascade::new("numero_guia", &[
            r"(?i)gu[ií]a\s*de\s*despacho(?:\s*electr[oó]nica)?\s*<NUM>?\s*:?\s*(\d{3,10})\b",
            r"(?i)<NUM>\s*:?\s*(\d{3,10})\b",
            r"(?i)folio\s*:?\s*(\d{3,10})\b",
        ]).unwrap(),
        rut_emisor: Cascade::new("rut_emisor", &[
            r"(?i)\br\.?\s?u\.?\s?t\.?\s*(?:emisor)?\s*:?\s*<RUT>",
        ]).unwrap(),
        fecha_documento: Cascade::new("fecha_documento", &[
            r"(?i)fecha\s*(?:de\s*)?(?:emisi[oó]n|documento)?\s*:?\s*<DATE>",
            r"<DATE>",
        ]).unwrap(),
        razon_social_emisor: Cascade::new("razon_social_emisor", &[
            r"(?i)(agencia\s+de\s+aduanas?\s+[a-záéíóúñ]+(?:\s+[a-záéíóúñ]+){0,3}?)\s+(?:r\.?\s?u\.?\s?t|gu[ií]a|giro)",
            r"(?i)raz[oó]n\s*social\s*:?\s*(.+?)\s+(?:r\.?\s?u\.?\s?t|giro|direcci)",
        ]).unwrap(),
        razon_social_receptor: Cascade::new("razon_social_receptor", &[
            r"(?i)(?:se[ñn]or(?:\(?es\)?)?|destinatario|cliente)\s*:?\s*(.+?)\s+(?:r\.?\s?u\.?\s?t|giro|direcci)",
        ]).unwrap(),
        rut_receptor: Cascade::new("rut_receptor", &[
            r"(?i)(?:se[ñn]or(?:\(?es\)?)?|destinatario|cliente)\s*:?\s*.+?r\.?\s?u\.?\s?t\.?\s*:?\s*<RUT>",
        ]).unwrap(),
    };

    static ref DIRECCION_DESTINO: Cascade = Cascade::new("direccion_destino", &[
        r"(?i)direcci[oó]n\s*(?:(?:de\s*)?(?:destino|despacho|entrega))?\s*:?\s*(.+?)\s+(?:comuna|ciudad|motivo|chofer|conductor|patente|fecha|giro)\b",
        r"(?i)lugar\s*de\s*(?:entrega|destino)\s*:?\s*(.+?)\s+(?:comuna|ciudad|chofer|conductor|patente)\b",
    ]).unwrap();

    static ref COMUNA: Cascade = Cascade::new("comuna", &[
        r"(?i)comuna\s*:?\s*(.+?)\s+(?:ciudad|motivo|chofer|conductor|patente|fecha|giro|direcci|tel[eé]fono|contenedor)",
        r"(?i)comuna\s*:?\s*([a-záéíóúñ]+(?:\s+[a-záéíóúñ]+)?)$",
    ]).unwrap();

    static ref MOTIVO_TRASLADO: Cascade = Cascade::new("motivo_traslado", &[
        r"(?i)motivo\s*(?:de\s*)?(?:traslado)?\s*:?\s*(.+?)\s+(?:chofer|conductor|patente|contenedor|total|monto|referencia|ref\.|din\b)",
        r"(?i)tipo\s*(?:de\s*)?traslado\s*:?\s*(.+?)\s+(?:chofer|conductor|patente|contenedor)",
    ]).unwrap();

    static ref CHOFER: Cascade = Cascade::new("chofer", &[
        r"(?i)(?:chofer|conductor)\s*:?\s*([a-záéíóúñ]+(?:\s+[a-záéíóúñ]+){1,4}?)\s+(?:r\.?\s?u\.?\s?t|patente|c[eé]dula)",
    ]).unwrap();

    static ref RUT_CHOFER: Cascade = Cascade::new("rut_chofer", &[
        r"(?i)r\.?\s?u\.?\s?t\.?\s*(?:del\s*)?(?:chofer|conductor)\s*:?\s*<RUT>",
        r"(?i)(?:chofer|conductor)\s*:?\s*[a-záéíóúñ ]+?\s*r\.?\s?u\.?\s?t\.?\s*:?\s*<RUT>",
    ]).unwrap();

    static ref PATENTE: Cascade = Cascade::new("patente", &[
        r"(?i)patente\s*(?:cami[oó]n|tracto)?\s*:?\s*([A-Z]{2}\s?-?\s?[A-Z0-9]{2}\s?-?\s?\d{2})\b",
        r"(?i)\bppu\s*:?\s*([A-Z]{2}\s?-?\s?[A-Z0-9]{2}\s?-?\s?\d{2})\b",
    ]).unwrap();

    static ref REFERENCIA_DIN: Cascade = Cascade::new("referencia_din", &[
        r"(?i)\bdin\s*(?:<NUM>)?\s*:?\s*(\d{10})\b",
        r"(?i)declaraci[oó]n\s*(?:de\s*)?ingreso\s*<NUM>?\s*:?\s*(\d{10})",
        r"(?i)\bref(?:erencia)?\.?\s*:?\s*(?:din)?\s*(\d{10})\b",
    ]).unwrap();

    static ref MONTO_TOTAL: Cascade = Cascade::new("monto_total", &[
        r"(?i)monto\s*total\s*:?\s*\$?\s*<AMOUNT>",
        r"(?i)\btotal\s*:?\s*\$?\s*<AMOUNT>",
    ]).unwrap();
}

/// Identify the issuing agency from its letterhead.
pub fn detect_format(text: &str) -> GuiaFormat {
    if JORGE_STEIN.is_match(text) {
        GuiaFormat::JorgeStein
    } else if ALBERTO_RUBIO.is_match(text) {
        GuiaFormat::AlbertoRubio
    } else {
        GuiaFormat::Unknown
    }
}

/// Text before the receiver block. The whole text when no block is found.
fn issuer_region(text: &str) -> &str {
    HEADER_END.find(text).map_or(text, |m| &text[..m.start()])
}

fn header_rules(format: GuiaFormat) -> &'static HeaderRules {
    match format {
        GuiaFormat::JorgeStein => &JORGE_STEIN_RULES,
        GuiaFormat::AlbertoRubio => &ALBERTO_RUBIO_RULES,
        GuiaFormat::Unknown => &GENERIC_RULES,
    }
}

/// Extracts [`GuiaDespacho`] records.
pub struct GuiaDespachoExtractor;

impl GuiaDespachoExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for GuiaDespachoExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentExtractor for GuiaDespachoExtractor {
    type Output = GuiaDespacho;

    fn kind(&self) -> DocumentKind {
        DocumentKind::GuiaDespacho
    }

    fn extract_into(&self, text: &str, doc: &mut GuiaDespacho) {
        doc.formato = detect_format(text);
        debug!(format = ?doc.formato, "guía letterhead");

        let header = header_rules(doc.formato);
        doc.numero_guia = header.numero_guia.text(text, digits);
        doc.rut_emisor = header.rut_emisor.text(issuer_region(text), rut);
        doc.fecha_documento = header.fecha_documento.value(text, date);
        doc.razon_social_emisor = header.razon_social_emisor.text(text, upper);
        doc.razon_social_receptor = header.razon_social_receptor.text(text, upper);
        doc.rut_receptor = header.rut_receptor.text(text, rut);

        doc.direccion_destino = DIRECCION_DESTINO.text(text, upper);
        doc.comuna = COMUNA.text(text, upper);
        doc.motivo_traslado = MOTIVO_TRASLADO.text(text, upper);
        doc.chofer = CHOFER.text(text, name);
        doc.rut_chofer = RUT_CHOFER.text(text, rut);
        doc.patente = PATENTE.text(text, compact);
        doc.contenedor = CONTENEDOR.text(text, container);
        doc.sello = SELLO.text(text, upper);
        doc.referencia_din = REFERENCIA_DIN.text(text, digits);
        doc.documento_transporte = DOCUMENTO_TRANSPORTE.text(text, reference);
        doc.monto_total = MONTO_TOTAL.value(text, clp);
    }
}
