//! Error types for the aduana-core library.

use thiserror::Error;

/// Main error type for the aduana library.
#[derive(Error, Debug)]
pub enum AduanaError {
    /// The input file was rejected before OCR.
    #[error("input error: {0}")]
    Input(#[from] InputError),

    /// OCR gateway failure.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while validating an input image.
#[derive(Error, Debug)]
pub enum InputError {
    /// The file has no content.
    #[error("{file}: file is empty")]
    Empty { file: String },

    /// The file exceeds the configured size limit.
    #[error("{file}: file is {size} bytes, limit is {limit}")]
    TooLarge { file: String, size: usize, limit: usize },

    /// The file extension promises a format whose signature is absent.
    #[error("{file}: missing {expected} signature")]
    InvalidSignature { file: String, expected: &'static str },

    /// Neither PNG nor JPEG.
    #[error("{file}: unsupported image format")]
    UnsupportedFormat { file: String },

    /// The signature is right but the image cannot be decoded.
    #[error("{file}: image cannot be decoded: {reason}")]
    Undecodable { file: String, reason: String },

    /// A multi-page document was submitted without pages.
    #[error("no pages to process")]
    NoPages,
}

/// Errors related to the OCR gateway.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Gateway credentials or endpoint are missing.
    #[error("OCR service not configured: {0}")]
    NotConfigured(String),

    /// The service reported itself unavailable.
    #[error("OCR service unavailable: {0}")]
    Unavailable(String),

    /// Transport or protocol failure talking to the service.
    #[error("OCR request failed: {0}")]
    Request(String),

    /// The analysis did not finish within the polling budget.
    #[error("OCR analysis timed out after {polls} polls")]
    Timeout { polls: u32 },

    /// The external OCR command failed.
    #[error("OCR command failed: {0}")]
    Command(String),

    /// The service returned no text at all.
    #[error("OCR returned no text")]
    EmptyText,
}

/// Errors related to document field extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// A document type name was not recognised.
    #[error("unknown document type: {0}")]
    UnknownDocumentKind(String),

    /// Extraction stopped part-way through a document.
    #[error("extraction of {document} aborted: {reason}")]
    Aborted { document: String, reason: String },
}

/// Result type for the aduana library.
pub type Result<T> = std::result::Result<T, AduanaError>;
