//! File format detection by extension

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Supported input formats
///
/// Anything else is unsupported and never reaches an extractor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Raw RFC 5322 message
    Eml,
    Pdf,
    /// `.doc` or `.docx`
    Word,
    /// Plain text
    Text,
    /// `.xls` or `.xlsx`
    Excel,
    /// `.png`, `.jpg` or `.jpeg`
    Image,
}

impl FileFormat {
    /// Map a lowercase or mixed-case extension (without the dot)
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "eml" => Some(Self::Eml),
            "pdf" => Some(Self::Pdf),
            "doc" | "docx" => Some(Self::Word),
            "txt" => Some(Self::Text),
            "xls" | "xlsx" => Some(Self::Excel),
            "png" | "jpg" | "jpeg" => Some(Self::Image),
            _ => None,
        }
    }

    /// Detect the format of a path; does not touch the filesystem
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        Self::from_extension(&extension_of(path))
    }

    /// Whether this format is extracted when found as an email attachment
    #[must_use]
    pub const fn is_attachment(self) -> bool {
        !matches!(self, Self::Eml)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eml => "eml",
            Self::Pdf => "pdf",
            Self::Word => "word",
            Self::Text => "text",
            Self::Excel => "excel",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lowercased extension of a path, empty when there is none
pub fn extension_of(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Final path component, used as a display name for documents
pub fn basename(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
