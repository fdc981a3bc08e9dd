//! Decoded PDF handles.

use crate::codec::PdfCodec;
use crate::error::{PdfMergeError, Result};

/// A successfully decoded PDF together with its page count and the name it
/// was submitted under.
///
/// A handle can only be obtained by decoding, so `page_count` always matches
/// what the codec reports for `document`. Handles are never mutated after
/// creation; the merge engine only reads from them.
#[derive(Debug, Clone)]
pub struct DocumentHandle<D> {
    document: D,
    page_count: usize,
    source_name: String,
}

impl<D> DocumentHandle<D> {
    /// Decode `bytes` with `codec`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::InvalidDocument`] naming `source_name` if the
    /// bytes cannot be decoded.
    pub fn decode<C>(codec: &C, bytes: &[u8], source_name: impl Into<String>) -> Result<Self>
    where
        C: PdfCodec<Document = D>,
    {
        let source_name = source_name.into();
        let document = codec
            .decode(bytes)
            .map_err(|err| PdfMergeError::invalid_document(&source_name, err.message()))?;
        let page_count = codec.page_count(&document);

        Ok(Self {
            document,
            page_count,
            source_name,
        })
    }

    /// The decoded document.
    pub fn document(&self) -> &D {
        &self.document
    }

    /// Number of pages; may be 0.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Name the document was submitted under.
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// Whether the document has no pages.
    pub fn is_empty(&self) -> bool {
        self.page_count == 0
    }
}
