//! Error types for email intake

use thiserror::Error;

/// Errors that can occur while ingesting or classifying a document.
///
/// Extraction problems never surface here: extractors fold them into
/// [`crate::Extraction::Failed`] so the pipeline keeps going. These variants
/// cover the seams that callers must handle themselves.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem access failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport to an external service failed
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse the MIME structure of an email
    #[error("Failed to parse email structure: {0}")]
    Mime(#[from] mailparse::MailParseError),

    /// PDF could not be read
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Word document could not be read
    #[error("Word document error: {0}")]
    Docx(String),

    /// OCR engine or service failed
    #[error("OCR error: {0}")]
    Ocr(String),

    /// LLM output was not a JSON object
    #[error("Failed to parse classifier response: {0}")]
    Response(String),

    /// The external classifier call failed
    #[error("Classifier error: {0}")]
    Classifier(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for intake operations
pub type Result<T> = std::result::Result<T, Error>;
