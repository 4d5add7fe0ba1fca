//! Assemble an [`EmailRecord`] into classifier-sized text chunks

use crate::normalize::normalize;
use crate::types::EmailRecord;
use std::fmt::Write;

/// Default maximum characters per chunk
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 4000;

/// Render metadata, body and attachments as one labeled document
#[must_use]
pub fn combine(record: &EmailRecord) -> String {
    let mut out = String::new();

    out.push_str("=== EMAIL METADATA ===\n");
    let _ = writeln!(out, "From: {}", record.from);
    let _ = writeln!(out, "To: {}", record.to);
    let _ = writeln!(out, "Date: {}", record.date);
    let _ = writeln!(out, "Subject: {}", record.subject);
    out.push_str("\n=== EMAIL BODY ===\n");
    out.push_str(&normalize(&record.email_body));

    for (i, attachment) in record.attachments.iter().enumerate() {
        let name = if attachment.filename.is_empty() {
            "Unnamed"
        } else {
            attachment.filename.as_str()
        };
        let _ = write!(out, "\n\n=== ATTACHMENT {}: {name} ===\n", i + 1);
        out.push_str(&normalize(attachment.extracted_text()));
    }

    out
}

/// Splits text on paragraph or sentence boundaries
#[derive(Debug, Clone, Copy)]
pub struct Chunker {
    max_chunk_size: usize,
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHUNK_SIZE)
    }
}

impl Chunker {
    /// Sizes are in characters; zero is treated as one
    #[must_use]
    pub fn new(max_chunk_size: usize) -> Self {
        Self {
            max_chunk_size: max_chunk_size.max(1),
        }
    }

    #[must_use]
    pub const fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    /// Split `text` into ordered chunks of at most `max_chunk_size` characters
    ///
    /// A cut prefers the last paragraph break in the window, then the last
    /// sentence end, as long as it lies past the window's midpoint; otherwise
    /// the window is cut at full length. Concatenating the chunks gives back
    /// the input.
    #[must_use]
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let max = self.max_chunk_size;

        if chars.len() <= max {
            return vec![text.to_string()];
        }

        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let mut end = start + max;
            if end >= chars.len() {
                chunks.push(chars[start..].iter().collect());
                break;
            }

            let midpoint = start + max / 2;
            if let Some(pos) = rfind_pair(&chars, start, end, ['\n', '\n']).filter(|&p| p > midpoint)
            {
                end = pos;
            } else if let Some(pos) =
                rfind_pair(&chars, start, end, ['.', ' ']).filter(|&p| p > midpoint)
            {
                end = pos + 1;
            }

            chunks.push(chars[start..end].iter().collect());
            start = end;
        }

        chunks
    }

    /// Combine a record and split it for the classifier
    #[must_use]
    pub fn prepare(&self, record: &EmailRecord) -> Vec<String> {
        self.chunk(&combine(record))
    }
}

// Last index `i` in `[start, end)` with `chars[i..i + 2] == pair` and `i + 2 <= end`
fn rfind_pair(chars: &[char], start: usize, end: usize, pair: [char; 2]) -> Option<usize> {
    if end < start + 2 {
        return None;
    }
    (start..=end - 2)
        .rev()
        .find(|&i| chars[i] == pair[0] && chars[i + 1] == pair[1])
}
