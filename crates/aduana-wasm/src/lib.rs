//! WASM bindings for Chilean customs document field extraction.
//!
//! OCR runs outside this module (in the browser or a service); these bindings
//! take the recognized text and return structured records.

use std::str::FromStr;

use rust_decimal::Decimal;
use wasm_bindgen::prelude::*;

use aduana_core::extraction::rules;
use aduana_core::models::config::ExtractionConfig;
use aduana_core::{DocumentKind, DocumentProcessor, ExtractedDocument};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Names accepted as document kinds.
#[wasm_bindgen]
pub fn document_kinds() -> js_sys::Array {
    DocumentKind::ALL
        .iter()
        .map(|k| JsValue::from_str(k.as_str()))
        .collect()
}

fn parse_kind(kind: &str) -> Result<DocumentKind, JsValue> {
    DocumentKind::from_str(kind).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn to_js(document: &ExtractedDocument) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(document).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Extract a document of `kind` from OCR text.
#[wasm_bindgen]
pub fn extract_from_text(kind: &str, text: &str) -> Result<JsValue, JsValue> {
    let kind = parse_kind(kind)?;
    let document = DocumentProcessor::new(ExtractionConfig::default()).process_text(kind, text);
    to_js(&document)
}

/// Collapse OCR whitespace the way the extractors see it.
#[wasm_bindgen]
pub fn normalize_text(text: &str) -> String {
    aduana_core::normalize_text(text)
}

/// Canonical RUT (`15.970.128-K`).
#[wasm_bindgen]
pub fn normalize_rut(rut: &str) -> String {
    rules::normalize_rut(rut)
}

/// Check the modulo 11 digit of a RUT.
#[wasm_bindgen]
pub fn verify_rut(rut: &str) -> bool {
    rules::verify_rut(rut)
}

/// Check the ISO 6346 digit of a container id.
#[wasm_bindgen]
pub fn verify_container(id: &str) -> bool {
    rules::verify_container(id)
}

/// Parse a date as printed on customs documents into `YYYY-MM-DD`.
#[wasm_bindgen]
pub fn parse_date(text: &str) -> Option<String> {
    rules::parse_date(text).map(|d| d.to_string())
}

/// Parse a Chilean amount (`8.153.962`) into a plain decimal string.
#[wasm_bindgen]
pub fn parse_chilean_amount(amount: &str) -> Option<String> {
    rules::parse_chilean_amount(amount).map(|d| d.to_string())
}

/// Format an amount in Chilean style (`1.234,50`).
#[wasm_bindgen]
pub fn format_chilean_amount(amount: f64) -> Option<String> {
    Decimal::try_from(amount)
        .ok()
        .map(|d| rules::format_chilean_amount(d.round_dp(2)))
}

/// Extractor bound to one document kind, for browser use.
#[wasm_bindgen]
pub struct CustomsExtractor {
    kind: DocumentKind,
    processor: DocumentProcessor,
}

#[wasm_bindgen]
impl CustomsExtractor {
    /// Create an extractor for `kind` (e.g. `"guia-despacho"`, `"tatc"`).
    #[wasm_bindgen(constructor)]
    pub fn new(kind: &str) -> Result<CustomsExtractor, JsValue> {
        Ok(Self {
            kind: parse_kind(kind)?,
            processor: DocumentProcessor::new(ExtractionConfig::default()),
        })
    }

    #[wasm_bindgen(getter)]
    pub fn kind(&self) -> String {
        self.kind.as_str().to_string()
    }

    /// Extract from the text of a single page.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.processor.process_text(self.kind, text))
    }

    /// Extract one document from the texts of its pages, in order.
    #[wasm_bindgen]
    pub fn extract_pages(&self, pages: Vec<String>) -> Result<JsValue, JsValue> {
        to_js(&self.processor.process_text_pages(self.kind, &pages))
    }

    /// Same as [`extract`](Self::extract), serialized as a JSON string.
    #[wasm_bindgen]
    pub fn extract_json(&self, text: &str) -> Result<String, JsValue> {
        let document = self.processor.process_text(self.kind, text);
        serde_json::to_string(&document).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

/// Lines recognized by a browser-side OCR engine, gathered page by page.
#[wasm_bindgen]
pub struct OcrPages {
    pages: Vec<Vec<String>>,
}

#[wasm_bindgen]
impl OcrPages {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { pages: vec![Vec::new()] }
    }

    /// Append a recognized line to the current page.
    #[wasm_bindgen]
    pub fn add_line(&mut self, text: &str) {
        if let Some(page) = self.pages.last_mut() {
            page.push(text.to_string());
        }
    }

    /// Start a new page.
    #[wasm_bindgen]
    pub fn next_page(&mut self) {
        self.pages.push(Vec::new());
    }

    #[wasm_bindgen]
    pub fn page_count(&self) -> usize {
        self.pages.iter().filter(|p| !p.is_empty()).count()
    }

    /// Text of every non-empty page, lines joined by newlines.
    #[wasm_bindgen]
    pub fn get_text(&self) -> String {
        self.page_texts().join("\n")
    }

    /// Extract a document of `kind` from the gathered pages.
    #[wasm_bindgen]
    pub fn extract(&self, kind: &str) -> Result<JsValue, JsValue> {
        let kind = parse_kind(kind)?;
        let document = DocumentProcessor::new(ExtractionConfig::default())
            .process_text_pages(kind, &self.page_texts());
        to_js(&document)
    }

    fn page_texts(&self) -> Vec<String> {
        self.pages
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| p.join("\n"))
            .collect()
    }
}

impl Default for OcrPages {
    fn default() -> Self {
        Self::new()
    }
}
