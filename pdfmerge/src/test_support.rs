//! Fixtures for unit tests.
//!
//! Every page carries a marker string `"<label>-p<n>"` in its content stream
//! so tests can check which source page landed where.

use crate::codec::{CodecError, PdfCodec};
use crate::document::DocumentHandle;
use lopdf::{Document, Object, Stream, dictionary};

/// Page label that makes [`FakeCodec::copy_pages`] fail.
pub(crate) const CORRUPT_PAGE: &str = "corrupt";

/// Page label that makes [`FakeCodec::encode`] fail.
pub(crate) const UNENCODABLE_PAGE: &str = "unencodable";

/// In-memory codec whose documents are lists of page labels.
///
/// Encoded form is `fake:` followed by comma separated labels.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct FakeCodec;

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeDocument {
    pub(crate) pages: Vec<String>,
}

impl PdfCodec for FakeCodec {
    type Document = FakeDocument;

    fn decode(&self, bytes: &[u8]) -> Result<FakeDocument, CodecError> {
        let text = std::str::from_utf8(bytes).map_err(|err| CodecError::new(err.to_string()))?;
        let body = text
            .strip_prefix("fake:")
            .ok_or_else(|| CodecError::new("missing fake header"))?;
        let pages = body
            .split(',')
            .filter(|label| !label.is_empty())
            .map(str::to_string)
            .collect();
        Ok(FakeDocument { pages })
    }

    fn page_count(&self, document: &FakeDocument) -> usize {
        document.pages.len()
    }

    fn new_document(&self) -> FakeDocument {
        FakeDocument::default()
    }

    fn copy_pages(
        &self,
        source: &FakeDocument,
        pages: &[usize],
        target: &mut FakeDocument,
    ) -> Result<(), CodecError> {
        if source.pages.iter().any(|label| label == CORRUPT_PAGE) {
            return Err(CodecError::new("corrupt page tree"));
        }
        for &index in pages {
            let label = source
                .pages
                .get(index)
                .ok_or_else(|| CodecError::new("page index out of range"))?;
            target.pages.push(label.clone());
        }
        Ok(())
    }

    fn encode(&self, document: FakeDocument) -> Result<Vec<u8>, CodecError> {
        if document.pages.iter().any(|label| label == UNENCODABLE_PAGE) {
            return Err(CodecError::new("cannot encode"));
        }
        Ok(format!("fake:{}", document.pages.join(",")).into_bytes())
    }
}

/// Encoded fake document with the given page labels.
pub(crate) fn fake_bytes(pages: &[&str]) -> Vec<u8> {
    format!("fake:{}", pages.join(",")).into_bytes()
}

/// Decoded fake handle with the given page labels.
pub(crate) fn fake_handle(name: &str, pages: &[&str]) -> DocumentHandle<FakeDocument> {
    DocumentHandle::decode(&FakeCodec, &fake_bytes(pages), name).unwrap()
}

/// Build a PDF with `pages` pages labelled `label`.
///
/// Resources and MediaBox live on the Pages node and are inherited by every
/// page, which exercises attribute materialization during copies.
pub(crate) fn pdf_bytes(label: &str, pages: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids = Vec::with_capacity(pages);
    for n in 1..=pages {
        let marker = format!("{label}-p{n}");
        let content = format!("BT /F1 12 Tf 72 720 Td ({marker}) Tj ET");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
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

/// Page markers of a serialized PDF, in page order.
pub(crate) fn page_markers(bytes: &[u8]) -> Vec<String> {
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
