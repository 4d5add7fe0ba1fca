//! Format-specific content extraction

use crate::config::ProcessorConfig;
use crate::error::Result;
use crate::format::{FileFormat, basename};
use crate::ocr::{ImageOcr, ImageOcrOutcome, OcrSpaceClient, PageOcr, TesseractPageOcr};
use crate::pdf::{PdfOcr, extract_pdf};
use crate::types::Extraction;
use crate::word::extract_word;
use std::path::Path;
use tracing::{error, info};

/// Turns files into text; failures come back as [`Extraction::Failed`]
pub struct Extractor {
    ocr_enabled: bool,
    ocr_min_chars: usize,
    ocr_scale: f32,
    page_ocr: Box<dyn PageOcr>,
    image_ocr: Box<dyn ImageOcr>,
}

impl Extractor {
    /// Extractor backed by local Tesseract and the OCR.space service
    pub fn new(config: &ProcessorConfig) -> Result<Self> {
        Ok(Self::with_ocr(
            config,
            Box::new(TesseractPageOcr::new(config.ocr_lang.clone())),
            Box::new(OcrSpaceClient::new(config.image_ocr.clone())?),
        ))
    }

    pub fn with_ocr(
        config: &ProcessorConfig,
        page_ocr: Box<dyn PageOcr>,
        image_ocr: Box<dyn ImageOcr>,
    ) -> Self {
        Self {
            ocr_enabled: config.ocr_enabled,
            ocr_min_chars: config.ocr_min_chars,
            ocr_scale: config.ocr_scale(),
            page_ocr,
            image_ocr,
        }
    }

    /// Extract text from `path` using the handler for `format`
    ///
    /// `Eml` files are read as plain text here; structured email parsing
    /// lives in [`crate::EmailParser`].
    pub fn extract(&self, format: FileFormat, path: &Path) -> Extraction {
        match format {
            FileFormat::Pdf => extract_pdf(
                path,
                PdfOcr {
                    engine: self.ocr_enabled.then_some(self.page_ocr.as_ref()),
                    min_chars: self.ocr_min_chars,
                    scale: self.ocr_scale,
                },
            ),
            FileFormat::Word => extract_word(path),
            FileFormat::Text | FileFormat::Eml => extract_text(path),
            FileFormat::Excel => extract_excel(path),
            FileFormat::Image => self.extract_image(path),
        }
    }

    fn extract_image(&self, path: &Path) -> Extraction {
        info!("Processing image file: {}", path.display());
        match self.image_ocr.recognize_image(path) {
            Ok(ImageOcrOutcome::Parsed(text)) => Extraction::Text(text),
            Ok(ImageOcrOutcome::Rejected(message)) => {
                error!("OCR service rejected {}: {message}", path.display());
                Extraction::failed(format!("Error: {message}"))
            }
            Err(e) => {
                error!("Error processing image file {}: {e}", path.display());
                Extraction::failed(format!("Error extracting text from image: {e}"))
            }
        }
    }
}

/// Read a text file, replacing invalid UTF-8 sequences
pub fn extract_text(path: &Path) -> Extraction {
    info!("Processing text file: {}", path.display());
    match std::fs::read(path) {
        Ok(bytes) => Extraction::Text(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            error!("Error processing text file {}: {e}", path.display());
            Extraction::failed(format!("Error extracting text from file: {e}"))
        }
    }
}

/// Spreadsheets are only acknowledged, not read
pub fn extract_excel(path: &Path) -> Extraction {
    info!("Processing Excel file: {}", path.display());
    Extraction::Text(format!(
        "[Excel content extracted from {}]",
        basename(path)
    ))
}
