//! Cascades and post-processors shared by several document types.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use rust_decimal::Decimal;

use crate::extraction::cascade::Cascade;
use crate::extraction::normalize::{compact_value, name_value, reference_value, upper_value};
use crate::extraction::rules::{
    normalize_container, normalize_rut, parse_chilean_amount, parse_count, parse_date,
    parse_us_amount,
};

// Post-processors passed to `Cascade::value`/`Cascade::text`.

pub(crate) fn upper(v: &str) -> Option<String> {
    upper_value(v)
}

pub(crate) fn name(v: &str) -> Option<String> {
    name_value(v)
}

pub(crate) fn compact(v: &str) -> Option<String> {
    compact_value(v)
}

pub(crate) fn reference(v: &str) -> Option<String> {
    reference_value(v)
}

pub(crate) fn digits(v: &str) -> Option<String> {
    let cleaned: String = v.chars().filter(|c| !c.is_whitespace()).collect();
    (!cleaned.is_empty()).then(|| cleaned.to_uppercase())
}

pub(crate) fn rut(v: &str) -> Option<String> {
    Some(normalize_rut(v))
}

pub(crate) fn date(v: &str) -> Option<NaiveDate> {
    parse_date(v)
}

pub(crate) fn clp(v: &str) -> Option<Decimal> {
    parse_chilean_amount(v)
}

pub(crate) fn usd(v: &str) -> Option<Decimal> {
    parse_us_amount(v)
}

pub(crate) fn count(v: &str) -> Option<u32> {
    parse_count(v)
}

pub(crate) fn container(v: &str) -> Option<String> {
    let id = normalize_container(v);
    (id.len() == 11).then_some(id)
}

lazy_static! {
    pub(crate) static ref ADUANA: Cascade = Cascade::new("aduana", &[
        r"(?i)\baduana\s+(?:de\s+)?(arica|iquique|antofagasta|tocopilla|chañaral|coquimbo|los\s+andes|valpara[ií]so|san\s+antonio|metropolitana|talcahuano|puerto\s+montt|osorno|coyhaique|puerto\s+ays[eé]n|punta\s+arenas)\b",
        r"(?i)\baduana\s*:\s*([a-záéíóúñ]+(?:\s+[a-záéíóúñ]+)?)\s+(?:resoluci|fecha|carn|c[oó]d|rut|nombre|tipo|agente)",
    ]).unwrap();

    pub(crate) static ref CODIGO_AGENTE: Cascade = Cascade::new("codigo_agente", &[
        r"(?i)c[oó]d(?:igo|\.)?\s*(?:de\s*)?(?:agente|despachador)?\s*:?\s*([A-Z]\s?-?\s?\d{2,3})\b",
        r"(?i)agente\s*(?:de\s*aduanas?)?\s*(?:n[°º]|c[oó]d\.?)?\s*:?\s*([A-Z]\s?-?\s?\d{2,3})\b",
        r"\b([A-Z]\d{2})\b",
    ]).unwrap();

    pub(crate) static ref NUMERO_MANIFIESTO: Cascade = Cascade::new("numero_manifiesto", &[
        r"(?i)(?:<NUM>\s*(?:de\s*)?)?manifiesto\s*(?:<NUM>)?\s*:?\s*(\d{4,12})\b",
        r"(?i)\bmanif\.?\s*(?:<NUM>)?\s*:?\s*(\d{4,12})\b",
    ]).unwrap();

    pub(crate) static ref DOCUMENTO_TRANSPORTE: Cascade = Cascade::new("documento_transporte", &[
        r"(?i)\b(?:b/?l|bill\s+of\s+lading|conocimiento\s+de\s+embarque)\b\s*(?:<NUM>)?\s*:?\s*([A-Z0-9]{6,20})\b",
        r"(?i)doc(?:umento)?\.?\s*(?:de\s*)?transporte\s*(?:<NUM>)?\s*:?\s*([A-Z0-9-]{6,20})\b",
    ]).unwrap();

    pub(crate) static ref CONTENEDOR: Cascade = Cascade::new("contenedor", &[
        r"(?i)contenedor(?:es)?\s*(?:<NUM>)?\s*:?\s*<CONTAINER>",
        r"(?i)\b(?:cont\.?|ctr|container)\s*(?:no\.?|<NUM>)?\s*:?\s*<CONTAINER>",
        r"\b([A-Z]{3}U\s?-?\s?\d{6}\s?-?\s?\d)\b",
    ]).unwrap();

    pub(crate) static ref SELLO: Cascade = Cascade::new("sello", &[
        r"(?i)(?:sellos?|precinto)\s*(?:<NUM>)?\s*:?\s*([A-Z0-9][A-Z0-9-]{4,19})\b",
        r"(?i)\bseal\s*(?:no\.?|number|<NUM>)?\s*:?\s*([A-Z0-9][A-Z0-9-]{4,19})\b",
    ]).unwrap();

    pub(crate) static ref NAVE: Cascade = Cascade::new("nave", &[
        r"(?i)(?:nave|vessel|buque)\s*(?:name)?\s*:?\s*(.+?)\s+(?:viaje|voyage|voy\.?|puerto|port|b/?l|eta|fecha|contenedor|manifiesto)\b",
    ]).unwrap();

    pub(crate) static ref VIAJE: Cascade = Cascade::new("viaje", &[
        r"(?i)\b(?:voyage|viaje|voy\.?)\s*(?:no\.?|<NUM>)?\s*:?\s*([A-Z0-9]{2,10})\b",
    ]).unwrap();

    pub(crate) static ref FECHA_ACEPTACION: Cascade = Cascade::new("fecha_aceptacion", &[
        r"(?i)fecha\s*de\s*aceptaci[oó]n\s*:?\s*<DATE>",
        r"(?i)fecha\s*aceptaci[oó]n\s*:?\s*<DATE>",
        r"(?i)aceptaci[oó]n\s*:?\s*<DATE>",
        r"\b(\d{8})\b",
    ]).unwrap();

    pub(crate) static ref OBSERVACIONES: Cascade = Cascade::new("observaciones", &[
        r"(?i)observaci[oó]n(?:es)?\s*:\s*(.+?)(?:\s+(?:firma|timbre|fecha|p[aá]gina)\b|$)",
    ]).unwrap();

    /// First labelled RUT anywhere in the document.
    pub(crate) static ref ANY_RUT: Cascade = Cascade::new("rut", &[
        r"(?i)\br\.?\s?u\.?\s?t\.?\s*(?:<NUM>)?\s*:?\s*<RUT>",
        r"<RUT>",
    ]).unwrap();
}
