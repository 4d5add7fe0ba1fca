//! Core types for ingested emails and documents

use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized email (or email-shaped document) ready to be combined
///
/// All five base fields are always present; an empty string means the
/// value was not found. `error` is set only when the email could not be
/// parsed at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRecord {
    /// Subject line
    pub subject: String,

    /// Sender as written in the header
    pub from: String,

    /// Recipients as written in the header
    pub to: String,

    /// Date header, unparsed
    pub date: String,

    /// Body text (HTML is passed through as-is)
    pub email_body: String,

    /// Attachments in source order
    pub attachments: Vec<AttachmentRecord>,

    /// Structural parse failure, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EmailRecord {
    /// Record for a standalone document that is not an email
    #[must_use]
    pub fn document(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            email_body: body.into(),
            ..Self::default()
        }
    }

    /// Record for an email that failed to parse
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Text extracted from one attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRecord {
    /// File name as given in the email
    pub filename: String,

    /// MIME type of the part
    pub content_type: String,

    /// Extraction outcome
    pub extracted: Extraction,
}

impl AttachmentRecord {
    /// Text to show downstream, real content or the embedded error message
    #[must_use]
    pub fn extracted_text(&self) -> &str {
        self.extracted.as_text()
    }
}

/// Outcome of a content extractor
///
/// Failures still carry a human-readable message that stands in for the
/// document text, so downstream formatting never has to branch on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum Extraction {
    /// Content recovered from the document
    Text(String),

    /// Placeholder message describing why extraction failed
    Failed(String),
}

impl Extraction {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// The text or failure message
    #[must_use]
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text(text) | Self::Failed(text) => text,
        }
    }

    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Text(text) | Self::Failed(text) => text,
        }
    }

    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for Extraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}
