//! PDF codec capability.
//!
//! The merge engine never looks at PDF bytes itself. Everything it needs from
//! a PDF library is expressed by [`PdfCodec`]: decode bytes into a document,
//! count pages, create an empty document, copy pages between documents, and
//! encode a document back to bytes.
//!
//! [`LopdfCodec`] is the implementation backed by the `lopdf` crate.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::codec::{LopdfCodec, PdfCodec};
//!
//! # fn example(a: &[u8], b: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
//! let codec = LopdfCodec::new();
//! let first = codec.decode(a)?;
//! let second = codec.decode(b)?;
//!
//! let mut output = codec.new_document();
//! codec.copy_pages(&first, &[0], &mut output)?;
//! codec.copy_pages(&second, &[0], &mut output)?;
//!
//! let bytes = codec.encode(output)?;
//! # Ok(())
//! # }
//! ```

pub mod lopdf_backend;

pub use lopdf_backend::LopdfCodec;

/// Error reported by a codec operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CodecError {
    message: String,
}

impl CodecError {
    /// Create a codec error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Capabilities the merge engine needs from a PDF library.
pub trait PdfCodec {
    /// Decoded document type.
    type Document;

    /// Decode raw bytes into a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a PDF this codec can read.
    fn decode(&self, bytes: &[u8]) -> Result<Self::Document, CodecError>;

    /// Number of pages in a decoded document.
    fn page_count(&self, document: &Self::Document) -> usize;

    /// Create an empty document with no pages.
    fn new_document(&self) -> Self::Document;

    /// Append pages of `source` to the end of `target`.
    ///
    /// `pages` holds 0-based page indices in the source's own page order;
    /// pages are appended in the order given. Page content and resources
    /// are carried over unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if an index is out of range or the source's internal
    /// structure cannot be followed.
    fn copy_pages(
        &self,
        source: &Self::Document,
        pages: &[usize],
        target: &mut Self::Document,
    ) -> Result<(), CodecError>;

    /// Serialize a document to bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn encode(&self, document: Self::Document) -> Result<Vec<u8>, CodecError>;
}
