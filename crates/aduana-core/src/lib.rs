//! Core library for Chilean customs document processing.
//!
//! This crate provides:
//! - OCR text normalization and cascade field matching
//! - Rule tables for seven customs document types (carnet aduanero, DIN,
//!   documento de recepción, guía de despacho, comprobante de transacción,
//!   selección de aforo, TATC)
//! - Validity policy and fixed confidence scoring
//! - OCR gateway abstraction (Azure Read and external command gateways with `native`)
//! - Input validation, content hashing and batch processing

pub mod error;
pub mod extraction;
pub mod input;
pub mod models;
pub mod ocr;
pub mod processor;
pub mod repository;

pub use error::{AduanaError, Result};
pub use extraction::{
    extract_document, normalize_text, DocumentExtractor, ExtractionOutcome,
};
pub use input::{ImageFormat, ScannedFile};
pub use models::config::AduanaConfig;
pub use models::document::{
    CustomsRecord, DocumentKind, DocumentMetadata, ExtractedDocument, ExtractionMethod,
};
pub use ocr::OcrGateway;
#[cfg(feature = "native")]
pub use ocr::{create_gateway, AzureReadGateway, CommandGateway};
pub use processor::{BatchFailure, BatchOutcome, DocumentProcessor};
pub use repository::{DocumentRepository, InMemoryRepository};
