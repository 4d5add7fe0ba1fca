#![allow(dead_code)]

use email_intake::{ImageOcr, ImageOcrOutcome, PageOcr, Pipeline, ProcessorConfig, Result};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Page OCR that records which pages it was asked for
#[derive(Clone, Default)]
pub struct StubPageOcr {
    pub pages: Arc<Mutex<Vec<usize>>>,
}

impl PageOcr for StubPageOcr {
    fn recognize_page(&self, _pdf: &Path, page_index: usize, _scale: f32) -> Result<String> {
        self.pages.lock().unwrap().push(page_index);
        Ok(format!("OCR TEXT page {page_index}"))
    }
}

/// Image OCR that answers with a fixed outcome and records what it saw
#[derive(Clone)]
pub struct StubImageOcr {
    pub outcome: ImageOcrOutcome,
    pub seen: Arc<Mutex<Vec<(PathBuf, bool)>>>,
}

impl StubImageOcr {
    pub fn parsed(text: &str) -> Self {
        Self {
            outcome: ImageOcrOutcome::Parsed(text.to_string()),
            seen: Arc::default(),
        }
    }

    pub fn rejected(message: &str) -> Self {
        Self {
            outcome: ImageOcrOutcome::Rejected(message.to_string()),
            seen: Arc::default(),
        }
    }
}

impl ImageOcr for StubImageOcr {
    fn recognize_image(&self, image: &Path) -> Result<ImageOcrOutcome> {
        self.seen
            .lock()
            .unwrap()
            .push((image.to_path_buf(), image.exists()));
        Ok(self.outcome.clone())
    }
}

pub fn pipeline() -> Pipeline {
    pipeline_with(
        ProcessorConfig::default(),
        StubPageOcr::default(),
        StubImageOcr::parsed("scanned text"),
    )
}

pub fn pipeline_with(
    config: ProcessorConfig,
    page_ocr: StubPageOcr,
    image_ocr: StubImageOcr,
) -> Pipeline {
    Pipeline::with_ocr(config, Box::new(page_ocr), Box::new(image_ocr)).unwrap()
}

/// Write a PDF with one line of Courier text per page
pub fn write_pdf(path: &Path, pages: &[&str]) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for text in pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 10.into()]),
                Operation::new("Td", vec![40.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(*text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        kids.push(page_id.into());
    }

    let count = i64::try_from(kids.len()).unwrap();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

/// Write a minimal DOCX whose body has one paragraph per entry
pub fn write_docx(path: &Path, paragraphs: &[&str]) {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{p}</w:t></w:r></w:p>"))
        .collect();
    let xml = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{body}</w:body></w:document>"
    );

    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    zip.start_file("word/document.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    zip.write_all(xml.as_bytes()).unwrap();
    zip.finish().unwrap();
}
