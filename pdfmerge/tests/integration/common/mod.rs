//! Shared helpers for the integration tests.
//!
//! PDFs are generated in memory rather than read from fixtures. Every page
//! carries a marker `"<label>-p<n>"` in its content stream so tests can tell
//! which input page ended up where in the merged output.

#![allow(dead_code)]

use lopdf::{Document, Object, Stream, dictionary};
use pdfmerge::{JobRunner, RunnerConfig, UploadedFile};
use std::path::Path;
use tempfile::TempDir;

/// Serialize a PDF with `pages` pages labelled `label`.
pub fn pdf_bytes(label: &str, pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let kids: Vec<Object> = (1..=pages)
        .map(|n| {
            let content = format!("BT /F1 12 Tf 72 720 Td ({label}-p{n}) Tj ET");
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }
        .into(),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// An upload named `<label>.pdf` with `pages` pages.
pub fn upload(label: &str, pages: usize) -> UploadedFile {
    UploadedFile::new(format!("{label}.pdf"), pdf_bytes(label, pages))
}

/// Page markers of a serialized PDF, in page order.
pub fn page_markers(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let content = doc.get_page_content(page_id).unwrap();
            let text = String::from_utf8_lossy(&content);
            let start = text.find('(').unwrap() + 1;
            let end = text[start..].find(')').unwrap() + start;
            text[start..end].to_string()
        })
        .collect()
}

/// Expected markers for `pages` pages labelled `label`.
pub fn markers(label: &str, pages: usize) -> Vec<String> {
    (1..=pages).map(|n| format!("{label}-p{n}")).collect()
}

/// A runner whose staging directories live under a fresh temporary root.
pub fn isolated_runner() -> (JobRunner, TempDir) {
    let root = TempDir::new().unwrap();
    let runner = JobRunner::new(RunnerConfig::default().with_staging_root(root.path()));
    (runner, root)
}

/// Whether `dir` has no entries left.
pub fn is_empty_dir(dir: &Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}
