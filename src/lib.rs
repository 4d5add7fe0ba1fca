// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Email Intake
//!
//! Turns inbound service-request emails and their attachments into text
//! chunks for an LLM classifier, and parses the classifier's JSON answer.
//!
//! # Features
//!
//! - Structured `.eml` parsing with attachment extraction
//! - PDF text extraction with OCR for scanned pages
//! - Word, plain text, image (remote OCR) and spreadsheet inputs
//! - Email detection inside PDFs and Word documents
//! - Paragraph- and sentence-aware chunking
//!
//! # Example
//!
//! ```rust
//! use email_intake::{Chunker, detect_email};
//!
//! let text = "From: borrower@example.com\nSubject: Rate change\n\nPlease review.";
//! let record = detect_email(text).unwrap();
//!
//! let chunks = Chunker::default().prepare(&record);
//! assert_eq!(chunks.len(), 1);
//! assert!(chunks[0].contains("Subject: Rate change"));
//! ```

mod combine;
mod config;
mod error;
mod extract;
mod format;
mod heuristic;
mod normalize;
mod ocr;
mod parser;
mod pdf;
mod pipeline;
mod request_types;
mod response;
mod types;
mod word;

pub use combine::{Chunker, DEFAULT_MAX_CHUNK_SIZE, combine};
pub use config::{BodyWalk, DEFAULT_OCR_ENDPOINT, ImageOcrConfig, ProcessorConfig};
pub use error::{Error, Result};
pub use extract::{Extractor, extract_excel, extract_text};
pub use format::{FileFormat, basename, extension_of};
pub use heuristic::detect_email;
pub use normalize::normalize;
pub use ocr::{
    ImageOcr, ImageOcrOutcome, OcrSpaceClient, PageOcr, TesseractPageOcr,
    parse_ocr_space_response,
};
pub use parser::EmailParser;
pub use pdf::{PdfOcr, extract_pdf};
pub use pipeline::{
    Classifier, ClassificationReport, ClassificationResponse, Pipeline, RESPONSE_FALLBACK,
};
pub use request_types::{RequestType, RequestTypes};
pub use response::{Classification, parse_response, strip_code_fence};
pub use types::*;
pub use word::extract_word;
