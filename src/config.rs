//! Processor configuration

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default endpoint of the OCR.space image service
pub const DEFAULT_OCR_ENDPOINT: &str = "https://api.ocr.space/parse/image";

/// Settings for the whole intake pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Run OCR on PDF pages with too little extractable text
    pub ocr_enabled: bool,

    /// Tesseract language code
    pub ocr_lang: String,

    /// Pages with fewer trimmed characters than this are OCRed
    pub ocr_min_chars: usize,

    /// Rasterization resolution for page OCR
    pub ocr_dpi: u32,

    /// Maximum characters per chunk handed to the classifier
    pub max_chunk_size: usize,

    /// How the multipart body is searched
    pub body_walk: BodyWalk,

    /// Remote OCR for standalone images
    pub image_ocr: ImageOcrConfig,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            ocr_enabled: true,
            ocr_lang: "eng".to_string(),
            ocr_min_chars: 50,
            ocr_dpi: 300,
            max_chunk_size: 4000,
            body_walk: BodyWalk::default(),
            image_ocr: ImageOcrConfig::default(),
        }
    }
}

impl ProcessorConfig {
    /// Defaults overridden by environment variables
    ///
    /// Reads `OCR_SPACE_API_KEY`, `INTAKE_MAX_CHUNK_SIZE`,
    /// `INTAKE_OCR_ENABLED` and `INTAKE_BODY_WALK`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] with an explicit variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(key) = lookup("OCR_SPACE_API_KEY").filter(|k| !k.trim().is_empty()) {
            config.image_ocr.api_key = Some(key.trim().to_string());
        }

        if let Some(raw) = lookup("INTAKE_MAX_CHUNK_SIZE") {
            config.max_chunk_size = raw.trim().parse().map_err(|_| {
                Error::Config(format!("INTAKE_MAX_CHUNK_SIZE is not a number: {raw}"))
            })?;
        }

        if let Some(raw) = lookup("INTAKE_OCR_ENABLED") {
            config.ocr_enabled = match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => {
                    return Err(Error::Config(format!(
                        "INTAKE_OCR_ENABLED is not a boolean: {raw}"
                    )));
                }
            };
        }

        if let Some(raw) = lookup("INTAKE_BODY_WALK") {
            config.body_walk = BodyWalk::parse(&raw)
                .ok_or_else(|| Error::Config(format!("unknown INTAKE_BODY_WALK: {raw}")))?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_chunk_size == 0 {
            return Err(Error::Config("max_chunk_size must be positive".into()));
        }
        if self.ocr_dpi == 0 {
            return Err(Error::Config("ocr_dpi must be positive".into()));
        }
        Ok(())
    }

    /// Scale factor from PDF points (72 per inch) to the OCR resolution
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ocr_scale(&self) -> f32 {
        self.ocr_dpi as f32 / 72.0
    }
}

/// Strategy for locating the body of a multipart email
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BodyWalk {
    /// Only the first sub-part of each multipart level is examined
    #[default]
    FirstPart,

    /// Every non-attachment part is searched, `text/plain` before `text/html`
    Full,
}

impl BodyWalk {
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "first-part" | "first_part" | "first" => Some(Self::FirstPart),
            "full" => Some(Self::Full),
            _ => None,
        }
    }
}

/// OCR.space client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageOcrConfig {
    pub endpoint: String,

    /// Sent as the `apikey` form field; the service rejects requests without it
    pub api_key: Option<String>,

    pub timeout_secs: u64,
}

impl Default for ImageOcrConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_OCR_ENDPOINT.to_string(),
            api_key: None,
            timeout_secs: 60,
        }
    }
}
