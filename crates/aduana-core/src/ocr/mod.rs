//! OCR gateways turning scanned images into raw text.

#[cfg(feature = "native")]
mod azure;
#[cfg(feature = "native")]
mod command;

#[cfg(feature = "native")]
pub use azure::AzureReadGateway;
#[cfg(feature = "native")]
pub use command::CommandGateway;

use crate::error::OcrError;
#[cfg(feature = "native")]
use crate::models::config::{OcrConfig, OcrProvider};

/// Markers older gateways wrote into the text instead of failing.
const SENTINELS: &[&str] = &[
    "servicio ocr no configurado",
    "ocr no configurado",
    "no configurado",
    "error en azure",
    "servicio no disponible",
    "ocr no disponible",
];

/// A service that reads the text out of an image.
pub trait OcrGateway: Send + Sync {
    /// Raw text of the image, lines separated by newlines.
    fn analyze(&self, image: &[u8]) -> Result<String, OcrError>;

    /// Short name for logs.
    fn name(&self) -> &str;
}

/// Reject gateway output that carries no document text.
///
/// Empty output becomes [`OcrError::EmptyText`]; text that opens with a
/// sentinel becomes [`OcrError::Unavailable`], whatever its length.
pub fn check_sentinel(text: String) -> Result<String, OcrError> {
    if text.trim().is_empty() {
        return Err(OcrError::EmptyText);
    }

    let lowered = text.trim_start().to_lowercase();
    if SENTINELS.iter().any(|s| lowered.starts_with(s)) {
        return Err(OcrError::Unavailable(text.trim().to_string()));
    }

    Ok(text)
}

/// Build the gateway selected by the configuration.
#[cfg(feature = "native")]
pub fn create_gateway(config: &OcrConfig) -> Result<Box<dyn OcrGateway>, OcrError> {
    match config.provider {
        OcrProvider::Azure => Ok(Box::new(AzureReadGateway::new(config)?)),
        OcrProvider::Command => Ok(Box::new(CommandGateway::new(config)?)),
    }
}
