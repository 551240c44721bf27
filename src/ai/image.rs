use std::fs;
use std::io;
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

/// Image types the receipt scanner accepts, keyed by file extension.
const SUPPORTED_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("webp", "image/webp"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
];

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Unsupported image type: {0}")]
    Unsupported(String),
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// MIME type for an image path, judged by extension only.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    SUPPORTED_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptImage {
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ReceiptImage {
    pub fn load(path: &Path) -> Result<Self, ImageError> {
        let mime_type = mime_for_path(path)
            .ok_or_else(|| ImageError::Unsupported(path.display().to_string()))?;
        let bytes = fs::read(path).map_err(|source| ImageError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self { mime_type, bytes })
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn mime_is_chosen_by_extension() {
        assert_eq!(mime_for_path(Path::new("receipt.JPG")), Some("image/jpeg"));
        assert_eq!(mime_for_path(Path::new("scan.webp")), Some("image/webp"));
        assert_eq!(mime_for_path(Path::new("notes.txt")), None);
        assert_eq!(mime_for_path(Path::new("no_extension")), None);
    }

    #[test]
    fn load_reads_supported_files() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(&[0x89, b'P', b'N', b'G']).unwrap();
        let image = ReceiptImage::load(file.path()).unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.to_base64(), "iVBORw==");
    }

    #[test]
    fn load_rejects_unsupported_and_missing_files() {
        assert!(matches!(
            ReceiptImage::load(Path::new("receipt.pdf")),
            Err(ImageError::Unsupported(_))
        ));
        assert!(matches!(
            ReceiptImage::load(Path::new("/definitely/not/here.png")),
            Err(ImageError::Read { .. })
        ));
    }
}
