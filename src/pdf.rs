//! PDF text extraction with an OCR fallback for scanned pages

use crate::ocr::PageOcr;
use crate::types::Extraction;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Page-level OCR settings; `None` OCR disables the fallback
#[derive(Clone, Copy)]
pub struct PdfOcr<'a> {
    pub engine: Option<&'a dyn PageOcr>,
    pub min_chars: usize,
    pub scale: f32,
}

/// Extract the text of every page, joined by newlines
pub fn extract_pdf(path: &Path, ocr: PdfOcr<'_>) -> Extraction {
    info!("Processing PDF file: {}", path.display());

    if !path.exists() {
        error!("PDF file does not exist: {}", path.display());
        return Extraction::failed("Error: PDF file does not exist");
    }

    match std::fs::metadata(path) {
        Ok(meta) if meta.len() == 0 => {
            error!("PDF file is empty: {}", path.display());
            return Extraction::failed("Error: PDF file is empty");
        }
        Ok(_) => {}
        Err(e) => {
            error!("Cannot stat PDF file {}: {e}", path.display());
            return Extraction::failed(format!("Error extracting text from PDF: {e}"));
        }
    }

    let page_count = match lopdf::Document::load(path) {
        Ok(doc) => doc.get_pages().len(),
        Err(e) => {
            error!("Not a valid PDF file {}: {e}", path.display());
            return Extraction::failed("Error: Not a valid PDF file");
        }
    };

    let pages = match direct_page_text(path) {
        Ok(pages) => pages,
        Err(e) if ocr.engine.is_some() => {
            // Every page goes through OCR instead
            warn!(
                "Direct text extraction failed for {}, using OCR for {page_count} pages: {e}",
                path.display()
            );
            vec![String::new(); page_count]
        }
        Err(e) => {
            error!("Error processing PDF file {}: {e}", path.display());
            return Extraction::failed(format!("Error extracting text from PDF: {e}"));
        }
    };

    Extraction::Text(merge_pages(path, pages, ocr))
}

fn direct_page_text(path: &Path) -> Result<Vec<String>, String> {
    // pdf-extract panics on some malformed font tables
    match catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_by_pages(path))) {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(e.to_string()),
        Err(payload) => Err(payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "pdf-extract panicked".to_string())),
    }
}

/// Replace sparse pages with OCR output and join the result
pub(crate) fn merge_pages(path: &Path, pages: Vec<String>, ocr: PdfOcr<'_>) -> String {
    pages
        .into_iter()
        .enumerate()
        .map(|(index, text)| {
            let Some(engine) = ocr.engine else {
                return text;
            };
            if text.trim().chars().count() >= ocr.min_chars {
                return text;
            }

            info!("Using OCR for page {index} of {}", path.display());
            match engine.recognize_page(path, index, ocr.scale) {
                Ok(recognized) => recognized,
                Err(e) => {
                    warn!("OCR failed for page {index} of {}: {e}", path.display());
                    text
                }
            }
        })
        .inspect(|text| debug!("Page yielded {} characters", text.len()))
        .collect::<Vec<_>>()
        .join("\n")
}
