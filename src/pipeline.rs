//! End-to-end intake: file to chunks, chunks to classification

use crate::combine::Chunker;
use crate::config::ProcessorConfig;
use crate::error::{Error, Result};
use crate::extract::Extractor;
use crate::format::{FileFormat, basename, extension_of};
use crate::heuristic::detect_email;
use crate::ocr::{ImageOcr, PageOcr};
use crate::parser::EmailParser;
use crate::request_types::RequestTypes;
use crate::response::{Classification, parse_response};
use crate::types::EmailRecord;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Shown instead of a classification when the LLM answer is not JSON
pub const RESPONSE_FALLBACK: &str = "JSON response could not be parsed";

/// The external LLM call
pub trait Classifier {
    /// Send `payload` framed by `system_instruction`, returning the raw answer
    fn classify(&self, payload: &str, system_instruction: &str) -> Result<String>;
}

/// Ingestion pipeline configured once and reused per file
pub struct Pipeline {
    config: ProcessorConfig,
    extractor: Extractor,
    chunker: Chunker,
}

impl Pipeline {
    /// Pipeline with Tesseract page OCR and the OCR.space image client
    pub fn new(config: ProcessorConfig) -> Result<Self> {
        config.validate()?;
        let extractor = Extractor::new(&config)?;
        Ok(Self::assemble(config, extractor))
    }

    /// Pipeline with caller-provided OCR backends
    pub fn with_ocr(
        config: ProcessorConfig,
        page_ocr: Box<dyn PageOcr>,
        image_ocr: Box<dyn ImageOcr>,
    ) -> Result<Self> {
        config.validate()?;
        let extractor = Extractor::with_ocr(&config, page_ocr, image_ocr);
        Ok(Self::assemble(config, extractor))
    }

    fn assemble(config: ProcessorConfig, extractor: Extractor) -> Self {
        let chunker = Chunker::new(config.max_chunk_size);
        Self {
            config,
            extractor,
            chunker,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    #[must_use]
    pub const fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    #[must_use]
    pub const fn chunker(&self) -> &Chunker {
        &self.chunker
    }

    #[must_use]
    pub const fn email_parser(&self) -> EmailParser<'_> {
        EmailParser::new(&self.extractor, self.config.body_walk)
    }

    /// Route a file to the matching parser or extractor
    ///
    /// `.eml` files are parsed structurally. Every other supported format is
    /// extracted to text and checked for email headers; text that does not
    /// look like an email becomes a document record titled by file name.
    pub fn process_input(&self, path: &Path) -> EmailRecord {
        let Some(format) = FileFormat::from_path(path) else {
            let ext = extension_of(path);
            warn!("Unsupported file type: {ext}");
            return EmailRecord::document(basename(path), format!("Unsupported file type: {ext}"));
        };

        info!("Processing input file: {} (type: {format})", path.display());

        if format == FileFormat::Eml {
            return self.email_parser().parse_file(path);
        }

        let extraction = self.extractor.extract(format, path);
        if !extraction.is_failure()
            && let Some(record) = detect_email(extraction.as_text())
        {
            info!("Detected email content inside {}", path.display());
            return record;
        }

        EmailRecord::document(basename(path), extraction.into_text())
    }

    /// Process a file into classifier-ready chunks
    pub fn process_file(&self, path: &Path) -> Vec<String> {
        let record = self.process_input(path);
        self.chunker.prepare(&record)
    }

    /// Process a file and classify it with the configured request types
    pub fn classify_file(
        &self,
        path: &Path,
        request_types: &RequestTypes,
        classifier: &dyn Classifier,
    ) -> Result<ClassificationReport> {
        let content = self.process_file(path).concat();
        let raw = classifier
            .classify(&content, &request_types.system_instruction())
            .map_err(|e| match e {
                Error::Classifier(_) => e,
                other => Error::Classifier(other.to_string()),
            })?;

        let response = match parse_response(&raw) {
            Ok(classification) => ClassificationResponse::Parsed(classification),
            Err(e) => {
                warn!("Error while processing classifier response: {e}");
                ClassificationResponse::Fallback(RESPONSE_FALLBACK.to_string())
            }
        };

        Ok(ClassificationReport {
            filename: basename(path),
            content,
            response,
        })
    }
}

/// What the caller returns to the end user for one classified file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub filename: String,

    /// The combined document sent to the classifier
    pub content: String,

    pub response: ClassificationResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassificationResponse {
    Parsed(Classification),

    /// User-visible notice that replaces an unparseable answer
    Fallback(String),
}

impl ClassificationResponse {
    #[must_use]
    pub const fn classification(&self) -> Option<&Classification> {
        match self {
            Self::Parsed(c) => Some(c),
            Self::Fallback(_) => None,
        }
    }
}
