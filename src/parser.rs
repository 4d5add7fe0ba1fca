//! MIME email parsing into an [`EmailRecord`]

use crate::config::BodyWalk;
use crate::error::Result;
use crate::extract::Extractor;
use crate::format::{FileFormat, basename};
use crate::types::{AttachmentRecord, EmailRecord};
use mailparse::{DispositionType, MailHeader, ParsedMail};
use std::path::Path;
use tempfile::TempDir;
use tracing::{debug, error, info};

/// Parses raw `.eml` content and extracts recognized attachments
pub struct EmailParser<'a> {
    extractor: &'a Extractor,
    body_walk: BodyWalk,
}

impl<'a> EmailParser<'a> {
    #[must_use]
    pub const fn new(extractor: &'a Extractor, body_walk: BodyWalk) -> Self {
        Self {
            extractor,
            body_walk,
        }
    }

    /// Parse an `.eml` file; unreadable files yield a failed record
    pub fn parse_file(&self, path: &Path) -> EmailRecord {
        info!("Processing .eml file: {}", path.display());
        match std::fs::read(path) {
            Ok(raw) => self.parse(&raw),
            Err(e) => {
                error!("Error processing .eml file {}: {e}", path.display());
                EmailRecord::failed(format!("Failed to process email: {e}"))
            }
        }
    }

    /// Parse raw message bytes
    ///
    /// Never fails: a structural error produces a record with `error` set
    /// and every other field blank.
    pub fn parse(&self, raw: &[u8]) -> EmailRecord {
        match self.try_parse(raw) {
            Ok(record) => record,
            Err(e) => {
                error!("Error processing email: {e}");
                EmailRecord::failed(format!("Failed to process email: {e}"))
            }
        }
    }

    fn try_parse(&self, raw: &[u8]) -> Result<EmailRecord> {
        let parsed = mailparse::parse_mail(raw)?;

        let email_body = if parsed.subparts.is_empty() {
            parsed.get_body()?
        } else {
            match self.body_walk {
                BodyWalk::FirstPart => first_part_body(&parsed),
                BodyWalk::Full => full_walk_body(&parsed),
            }
        };

        let record = EmailRecord {
            subject: header(&parsed.headers, "subject"),
            from: header(&parsed.headers, "from"),
            to: header(&parsed.headers, "to"),
            date: header(&parsed.headers, "date"),
            email_body,
            attachments: self.process_attachments(&parsed)?,
            error: None,
        };

        debug!(
            "Parsed email '{}' from {} with {} attachments",
            record.subject,
            record.from,
            record.attachments.len()
        );

        Ok(record)
    }

    fn process_attachments(&self, parsed: &ParsedMail) -> Result<Vec<AttachmentRecord>> {
        let mut candidates = Vec::new();
        collect_attachments(parsed, is_body_container(parsed), &mut candidates);
        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        // Dropping the directory removes every saved attachment
        let scratch = TempDir::with_prefix("email-attachments-")?;
        let mut attachments = Vec::new();

        for (filename, part) in candidates {
            let Some(format) = FileFormat::from_path(&filename).filter(|f| f.is_attachment())
            else {
                debug!("Skipping attachment with unsupported type: {filename}");
                continue;
            };

            match self.process_attachment(scratch.path(), &filename, format, part) {
                Ok(record) => attachments.push(record),
                Err(e) => error!("Error processing attachment {filename}: {e}"),
            }
        }

        Ok(attachments)
    }

    fn process_attachment(
        &self,
        dir: &Path,
        filename: &str,
        format: FileFormat,
        part: &ParsedMail,
    ) -> Result<AttachmentRecord> {
        let saved = dir.join(basename(filename));
        std::fs::write(&saved, part.get_body_raw()?)?;

        info!("Extracting {format} attachment {filename}");
        Ok(AttachmentRecord {
            filename: filename.to_string(),
            content_type: part.ctype.mimetype.to_lowercase(),
            extracted: self.extractor.extract(format, &saved),
        })
    }
}

fn header(headers: &[MailHeader], name: &str) -> String {
    headers
        .iter()
        .find(|h| h.get_key().eq_ignore_ascii_case(name))
        .map(MailHeader::get_value)
        .unwrap_or_default()
}

fn filename_of(part: &ParsedMail) -> Option<String> {
    let disposition = part.get_content_disposition();
    disposition
        .params
        .get("filename")
        .or_else(|| part.ctype.params.get("name"))
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}

fn is_attachment(part: &ParsedMail) -> bool {
    part.get_content_disposition().disposition == DispositionType::Attachment
}

// `multipart/related` and `multipart/alternative` hold the message body and
// its inline resources
fn is_body_container(part: &ParsedMail) -> bool {
    let mimetype = part.ctype.mimetype.to_lowercase();
    mimetype == "multipart/related" || mimetype == "multipart/alternative"
}

// Leaf parts below the root that carry a file name, in document order. Inside
// a body container only parts explicitly disposed as attachments count.
fn collect_attachments<'p>(
    parsed: &'p ParsedMail<'p>,
    in_body: bool,
    out: &mut Vec<(String, &'p ParsedMail<'p>)>,
) {
    for part in &parsed.subparts {
        if !part.subparts.is_empty() {
            collect_attachments(part, in_body || is_body_container(part), out);
        } else if in_body && !is_attachment(part) {
            debug!("Skipping inline body part {}", part.ctype.mimetype);
        } else if let Some(name) = filename_of(part) {
            out.push((name, part));
        }
    }
}

fn text_content(part: &ParsedMail) -> String {
    let mimetype = part.ctype.mimetype.to_lowercase();
    if mimetype == "text/plain" || mimetype == "text/html" {
        part.get_body().unwrap_or_default()
    } else {
        String::new()
    }
}

/// Examine only the first sub-part at each multipart level
fn first_part_body(parsed: &ParsedMail) -> String {
    let Some(part) = parsed.subparts.first() else {
        return String::new();
    };
    let mimetype = part.ctype.mimetype.to_lowercase();

    if mimetype.starts_with("text/") {
        text_content(part)
    } else if mimetype.starts_with("multipart/") {
        first_part_body(part)
    } else {
        String::new()
    }
}

/// Depth-first search of all body parts, plain text first
fn full_walk_body(parsed: &ParsedMail) -> String {
    find_part(parsed, "text/plain")
        .or_else(|| find_part(parsed, "text/html"))
        .and_then(|part| part.get_body().ok())
        .unwrap_or_default()
}

fn find_part<'p>(parsed: &'p ParsedMail<'p>, mimetype: &str) -> Option<&'p ParsedMail<'p>> {
    parsed.subparts.iter().find_map(|part| {
        if !part.subparts.is_empty() {
            find_part(part, mimetype)
        } else if !is_attachment(part) && part.ctype.mimetype.eq_ignore_ascii_case(mimetype) {
            Some(part)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let parsed = mailparse::parse_mail(b"SUBJECT: Escrow\r\nfrom: a@b.com\r\n\r\nbody").unwrap();
        assert_eq!(header(&parsed.headers, "subject"), "Escrow");
        assert_eq!(header(&parsed.headers, "From"), "a@b.com");
        assert_eq!(header(&parsed.headers, "date"), "");
    }

    #[test]
    fn test_filename_from_content_type_name() {
        let raw = b"Content-Type: multipart/mixed; boundary=\"b\"\r\n\r\n\
                    --b\r\n\
                    Content-Type: application/pdf; name=\"statement.pdf\"\r\n\r\n\
                    data\r\n\
                    --b--\r\n";
        let parsed = mailparse::parse_mail(raw).unwrap();
        assert_eq!(
            filename_of(&parsed.subparts[0]).as_deref(),
            Some("statement.pdf")
        );
    }
}
