use std::path::Path;

use tesseract::Tesseract;

use super::TextRecognizer;
use crate::core::SukiyakiError;

/// Recognizer backed by the system Tesseract installation. Each call spins
/// up a fresh engine for the configured language.
pub struct TesseractOcr {
    lang: String,
}

impl TesseractOcr {
    pub fn new(lang: &str) -> Self {
        TesseractOcr { lang: lang.to_string() }
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        TesseractOcr::new("jpn")
    }
}

impl TextRecognizer for TesseractOcr {
    fn recognize(&self, image: &Path) -> Result<String, SukiyakiError> {
        let path = image
            .to_str()
            .ok_or_else(|| SukiyakiError::Custom(format!("Non-UTF-8 image path: {:?}", image)))?;

        let text = Tesseract::new(None, Some(self.lang.as_str()))
            .map_err(|e| SukiyakiError::Custom(format!("Tesseract init failed: {}", e)))?
            .set_image(path)
            .map_err(|e| SukiyakiError::Custom(format!("Failed to load image {}: {}", path, e)))?
            .recognize()
            .map_err(|e| SukiyakiError::Custom(format!("Recognition failed for {}: {}", path, e)))?
            .get_text()
            .map_err(|e| SukiyakiError::Custom(format!("Failed to read text for {}: {}", path, e)))?;

        Ok(text)
    }
}
