//! Scanned input files: format checks and content hashing.

use std::fmt;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{AduanaError, InputError};
use crate::models::config::ExtractionConfig;

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Image formats accepted for OCR.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Detect the format from the leading bytes.
    pub fn from_signature(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(PNG_SIGNATURE) {
            Some(ImageFormat::Png)
        } else if bytes.starts_with(JPEG_SIGNATURE) {
            Some(ImageFormat::Jpeg)
        } else {
            None
        }
    }

    /// Format promised by a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ImageFormat::Png => "PNG",
            ImageFormat::Jpeg => "JPEG",
        }
    }

    fn decoder_format(&self) -> image::ImageFormat {
        match self {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scanned page held in memory together with its content hash.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    name: String,
    bytes: Vec<u8>,
    content_hash: String,
}

impl ScannedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let content_hash = sha256_hex(&bytes);
        Self {
            name: name.into(),
            bytes,
            content_hash,
        }
    }

    /// Read a file from disk.
    pub fn from_path(path: &Path) -> Result<Self, AduanaError> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, bytes))
    }

    /// Read a whole stream, then rewind it so the caller can reuse it.
    pub fn from_reader<R: Read + Seek>(
        name: impl Into<String>,
        reader: &mut R,
    ) -> Result<Self, AduanaError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        reader.seek(SeekFrom::Start(0))?;
        Ok(Self::new(name, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hex SHA-256 of the content.
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn detect_format(&self) -> Option<ImageFormat> {
        ImageFormat::from_signature(&self.bytes)
    }

    fn extension_format(&self) -> Option<ImageFormat> {
        Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(ImageFormat::from_extension)
    }

    /// Check the file before it is sent to OCR.
    pub fn validate(&self, config: &ExtractionConfig) -> Result<ImageFormat, InputError> {
        let file = self.name.clone();

        if self.bytes.is_empty() {
            return Err(InputError::Empty { file });
        }

        let limit = config.max_file_size_bytes;
        if limit > 0 && self.bytes.len() > limit {
            return Err(InputError::TooLarge {
                file,
                size: self.bytes.len(),
                limit,
            });
        }

        let detected = self.detect_format();
        let format = match (self.extension_format(), detected) {
            (Some(expected), Some(found)) if expected == found => found,
            (Some(expected), _) => {
                return Err(InputError::InvalidSignature {
                    file,
                    expected: expected.name(),
                });
            }
            (None, Some(found)) => found,
            (None, None) => return Err(InputError::UnsupportedFormat { file }),
        };

        if config.verify_decodable {
            image::load_from_memory_with_format(&self.bytes, format.decoder_format()).map_err(
                |e| InputError::Undecodable {
                    file: file.clone(),
                    reason: e.to_string(),
                },
            )?;
        }

        debug!(file = %self.name, %format, bytes = self.bytes.len(), "input accepted");
        Ok(format)
    }
}

/// Hex-encoded SHA-256 digest.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// SHA-256 over the bytes of several pages, in order.
///
/// Equal to the page's own hash for a single page.
pub fn combined_hash(pages: &[ScannedFile]) -> String {
    let mut hasher = Sha256::new();
    for page in pages {
        hasher.update(&page.bytes);
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = image::RgbImage::from_pixel(4, 4, image::Rgb([255, 255, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(
            ImageFormat::from_signature(&png_bytes()),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_signature(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::from_signature(b"%PDF-1.7"), None);
    }

    #[test]
    fn test_valid_png() {
        let file = ScannedFile::new("guia.png", png_bytes());
        let format = file.validate(&ExtractionConfig::default()).unwrap();
        assert_eq!(format, ImageFormat::Png);
        assert_eq!(file.content_hash().len(), 64);
    }

    #[test]
    fn test_empty_file() {
        let file = ScannedFile::new("vacio.png", Vec::new());
        assert!(matches!(
            file.validate(&ExtractionConfig::default()),
            Err(InputError::Empty { .. })
        ));
    }

    #[test]
    fn test_extension_signature_mismatch() {
        let file = ScannedFile::new("foto.jpg", png_bytes());
        assert!(matches!(
            file.validate(&ExtractionConfig::default()),
            Err(InputError::InvalidSignature { expected: "JPEG", .. })
        ));
    }

    #[test]
    fn test_unsupported_format() {
        let file = ScannedFile::new("scan.bin", b"GIF89a....".to_vec());
        assert!(matches!(
            file.validate(&ExtractionConfig::default()),
            Err(InputError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_too_large() {
        let config = ExtractionConfig {
            max_file_size_bytes: 10,
            ..Default::default()
        };
        let file = ScannedFile::new("guia.png", png_bytes());
        assert!(matches!(
            file.validate(&config),
            Err(InputError::TooLarge { limit: 10, .. })
        ));
    }

    #[test]
    fn test_truncated_png_is_undecodable() {
        let mut bytes = png_bytes();
        bytes.truncate(20);
        let file = ScannedFile::new("roto.png", bytes.clone());
        assert!(matches!(
            file.validate(&ExtractionConfig::default()),
            Err(InputError::Undecodable { .. })
        ));

        let lenient = ExtractionConfig {
            verify_decodable: false,
            ..Default::default()
        };
        assert_eq!(file.validate(&lenient).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_combined_hash() {
        let single = ScannedFile::new("a.png", b"abc".to_vec());
        assert_eq!(combined_hash(std::slice::from_ref(&single)), single.content_hash());

        let pages = [
            ScannedFile::new("1.png", b"ab".to_vec()),
            ScannedFile::new("2.png", b"c".to_vec()),
        ];
        assert_eq!(combined_hash(&pages), sha256_hex(b"abc"));
    }

    #[test]
    fn test_from_reader_rewinds() {
        let mut cursor = Cursor::new(png_bytes());
        let file = ScannedFile::from_reader("guia.png", &mut cursor).unwrap();
        assert_eq!(cursor.position(), 0);
        assert_eq!(file.len(), cursor.get_ref().len());
        assert_eq!(file.content_hash(), sha256_hex(cursor.get_ref()));
    }
}
