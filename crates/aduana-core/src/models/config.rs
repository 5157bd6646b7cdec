//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

/// Environment variable consulted when no OCR key is configured.
pub const OCR_KEY_ENV: &str = "ADUANA_OCR_KEY";

/// Main configuration for the aduana pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AduanaConfig {
    /// OCR gateway configuration.
    pub ocr: OcrConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,
}

/// Which OCR gateway to build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrProvider {
    /// Azure Computer Vision Read API.
    #[default]
    Azure,
    /// External OCR command over a temporary file.
    Command,
}

/// OCR gateway configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    pub provider: OcrProvider,

    /// Service endpoint (e.g. `https://<resource>.cognitiveservices.azure.com`).
    pub endpoint: Option<String>,

    /// Subscription key; falls back to `ADUANA_OCR_KEY`.
    pub api_key: Option<String>,

    /// Read API version path segment.
    pub api_version: String,

    /// Language hint passed to the service.
    pub language: String,

    /// Delay between polls of a pending analysis.
    pub poll_interval_ms: u64,

    /// Maximum number of polls before giving up.
    pub max_polls: u32,

    /// HTTP timeout per request.
    pub timeout_secs: u64,

    /// Program run by the command gateway.
    pub command: String,

    /// Arguments for the command; `{input}` is replaced by the image path.
    pub command_args: Vec<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            provider: OcrProvider::Azure,
            endpoint: None,
            api_key: None,
            api_version: "v3.2".to_string(),
            language: "es".to_string(),
            poll_interval_ms: 1000,
            max_polls: 30,
            timeout_secs: 30,
            command: "tesseract".to_string(),
            command_args: vec![
                "{input}".to_string(),
                "stdout".to_string(),
                "-l".to_string(),
                "spa".to_string(),
            ],
        }
    }
}

impl OcrConfig {
    /// Configured key, or the value of `ADUANA_OCR_KEY`.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(OCR_KEY_ENV).ok().filter(|k| !k.trim().is_empty()))
    }
}

/// Field extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Confidence reported for documents extracted from images.
    pub image_confidence: f32,

    /// Confidence reported for documents extracted from supplied text.
    pub text_confidence: f32,

    /// Largest accepted image in bytes (0 = unlimited).
    pub max_file_size_bytes: usize,

    /// Decode images fully before OCR to reject corrupt files early.
    pub verify_decodable: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            image_confidence: 0.7,
            text_confidence: 0.8,
            max_file_size_bytes: 20 * 1024 * 1024,
            verify_decodable: true,
        }
    }
}

impl AduanaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_confidences() {
        let config = AduanaConfig::default();
        assert_eq!(config.extraction.image_confidence, 0.7);
        assert_eq!(config.extraction.text_confidence, 0.8);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AduanaConfig =
            serde_json::from_str(r#"{"ocr": {"provider": "command"}}"#).unwrap();
        assert_eq!(config.ocr.provider, OcrProvider::Command);
        assert_eq!(config.ocr.command, "tesseract");
        assert_eq!(config.extraction.text_confidence, 0.8);
    }

    #[test]
    fn test_configured_key_wins() {
        let config = OcrConfig {
            api_key: Some("abc".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolved_api_key().as_deref(), Some("abc"));
    }
}
