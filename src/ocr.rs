//! OCR backends: local page OCR for scanned PDFs and a remote image service

use crate::config::ImageOcrConfig;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use std::process::Command;
use std::time::Duration;
use tracing::debug;

/// Recognizes the text of one rasterized PDF page
pub trait PageOcr: Send + Sync {
    /// `page_index` is zero-based; `scale` maps PDF points to pixels
    fn recognize_page(&self, pdf: &Path, page_index: usize, scale: f32) -> Result<String>;
}

/// Recognizes the text of a standalone image file
pub trait ImageOcr: Send + Sync {
    fn recognize_image(&self, image: &Path) -> Result<ImageOcrOutcome>;
}

/// Answer from an OCR service that was reached successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOcrOutcome {
    /// Text of the first parsed result
    Parsed(String),

    /// The service processed the request but reported an error
    Rejected(String),
}

/// Page OCR through the `pdftoppm` and `tesseract` command line tools
#[derive(Debug, Clone)]
pub struct TesseractPageOcr {
    lang: String,
}

impl TesseractPageOcr {
    pub fn new(lang: impl Into<String>) -> Self {
        Self { lang: lang.into() }
    }
}

impl PageOcr for TesseractPageOcr {
    fn recognize_page(&self, pdf: &Path, page_index: usize, scale: f32) -> Result<String> {
        let scratch = tempfile::Builder::new().prefix("page-ocr-").tempdir()?;
        let prefix = scratch.path().join("page");
        let page = (page_index + 1).to_string();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let dpi = ((scale * 72.0).round() as u32).to_string();

        let status = Command::new("pdftoppm")
            .args(["-png", "-singlefile", "-r", dpi.as_str()])
            .args(["-f", page.as_str(), "-l", page.as_str()])
            .arg(pdf)
            .arg(&prefix)
            .status()?;
        if !status.success() {
            return Err(Error::Ocr(format!("pdftoppm exited with {status}")));
        }

        let image = prefix.with_extension("png");
        let output = Command::new("tesseract")
            .arg(&image)
            .arg("stdout")
            .args(["-l", self.lang.as_str()])
            .output()?;
        if !output.status.success() {
            return Err(Error::Ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        debug!("OCR recognized page {page} of {}", pdf.display());
        Ok(String::from_utf8_lossy(&output.stdout).replace('\x0c', ""))
    }
}

/// Client for the OCR.space `parse/image` endpoint
#[derive(Debug, Clone)]
pub struct OcrSpaceClient {
    client: reqwest::blocking::Client,
    config: ImageOcrConfig,
}

impl OcrSpaceClient {
    pub fn new(config: ImageOcrConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }
}

impl ImageOcr for OcrSpaceClient {
    fn recognize_image(&self, image: &Path) -> Result<ImageOcrOutcome> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config("OCR.space API key is not configured".into()))?;

        let form = reqwest::blocking::multipart::Form::new()
            .text("apikey", api_key.to_string())
            .text("isOverlayRequired", "false")
            .file("file", image)?;

        let body = self
            .client
            .post(&self.config.endpoint)
            .multipart(form)
            .send()?
            .error_for_status()?
            .text()?;

        parse_ocr_space_response(&body)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OcrSpaceResponse {
    #[serde(default)]
    is_errored_on_processing: bool,
    #[serde(default)]
    error_message: Option<serde_json::Value>,
    #[serde(default)]
    parsed_results: Vec<OcrSpaceResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OcrSpaceResult {
    #[serde(default)]
    parsed_text: String,
}

/// Interpret an OCR.space JSON body
pub fn parse_ocr_space_response(body: &str) -> Result<ImageOcrOutcome> {
    let response: OcrSpaceResponse = serde_json::from_str(body)?;

    if response.is_errored_on_processing {
        return Ok(ImageOcrOutcome::Rejected(render_error_message(
            response.error_message.as_ref(),
        )));
    }

    response
        .parsed_results
        .into_iter()
        .next()
        .map(|r| ImageOcrOutcome::Parsed(r.parsed_text))
        .ok_or_else(|| Error::Ocr("response contained no parsed results".into()))
}

// The service sends either a string or a list of strings
fn render_error_message(value: Option<&serde_json::Value>) -> String {
    match value {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map_or_else(|| item.to_string(), str::to_string))
            .collect::<Vec<_>>()
            .join("; "),
        Some(serde_json::Value::Null) | None => "unknown error".to_string(),
        Some(other) => other.to_string(),
    }
}
