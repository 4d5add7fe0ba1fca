//! Word document text extraction (DOCX = zip archive with WordprocessingML)

use crate::error::{Error, Result};
use crate::types::Extraction;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::io::Read;
use std::path::Path;
use tracing::{error, info};

/// Extract all paragraph text from a Word document
pub fn extract_word(path: &Path) -> Extraction {
    info!("Processing Word file: {}", path.display());
    match read_docx(path) {
        Ok(text) => Extraction::Text(text),
        Err(e) => {
            error!("Error processing Word file {}: {e}", path.display());
            Extraction::failed(format!("Error extracting text from Word document: {e}"))
        }
    }
}

fn read_docx(path: &Path) -> Result<String> {
    let file = std::fs::File::open(path)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| Error::Docx(format!("not a DOCX archive: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|_| Error::Docx("no word/document.xml in archive".into()))?
        .read_to_string(&mut xml)?;

    document_text(&xml)
}

/// Collect run text from `word/document.xml`, one line per paragraph
pub(crate) fn document_text(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.local_name().as_ref() == b"t" => in_text = true,
            Ok(Event::Text(e)) if in_text => {
                let chunk = e.unescape().map_err(|e| Error::Docx(e.to_string()))?;
                text.push_str(&chunk);
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" => text.push('\t'),
                b"br" | b"cr" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Docx(format!("malformed document.xml: {e}"))),
            _ => {}
        }
    }

    Ok(text)
}
