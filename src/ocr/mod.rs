#[cfg(feature = "tesseract")]
pub mod tesseract;

use std::path::Path;

use crate::core::SukiyakiError;

#[cfg(feature = "tesseract")]
pub use self::tesseract::TesseractOcr;

/// Text recognition behind a trait: image file in, recognized text out. The
/// pipeline treats the engine as opaque and only ever sees the text.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, image: &Path) -> Result<String, SukiyakiError>;
}
