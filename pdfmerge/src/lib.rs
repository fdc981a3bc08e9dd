//! pdfmerge - Merge an ordered batch of PDF documents into a single PDF.
//!
//! This library takes uploaded PDF files, decodes them, arranges them in the
//! requested order and produces one merged document. It provides:
//!
//! - A decode/copy/encode codec seam with an `lopdf` backend
//! - An ordered, editable source list
//! - A merge orchestrator that skips page-less sources
//! - A job runner with per-job staging that is always cleaned up
//! - Typed errors for every failure a merge can hit
//!
//! # Examples
//!
//! ## Running a merge job
//!
//! ```no_run
//! use pdfmerge::{JobRunner, MergeRequest, UploadedFile};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let files = vec![
//!     UploadedFile::new("cover.pdf", std::fs::read("cover.pdf")?),
//!     UploadedFile::new("body.pdf", std::fs::read("body.pdf")?),
//! ];
//! let request = MergeRequest::new(files)
//!     .with_order(vec![1, 0])
//!     .with_output_name("report");
//!
//! let output = JobRunner::default().run_job(request).await?;
//! println!(
//!     "{} pages -> {}",
//!     output.statistics.total_pages, output.suggested_file_name
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Using Individual Components
//!
//! ```no_run
//! use pdfmerge::codec::LopdfCodec;
//! use pdfmerge::document::DocumentHandle;
//! use pdfmerge::merge::Merger;
//! use pdfmerge::source::SourceList;
//!
//! # fn example(a: &[u8], b: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
//! let codec = LopdfCodec::new();
//! let mut sources = SourceList::new();
//! sources.append(DocumentHandle::decode(&codec, a, "a.pdf")?);
//! let second = sources.append(DocumentHandle::decode(&codec, b, "b.pdf")?);
//! sources.move_to(second, 0)?;
//!
//! let result = Merger::new(codec).merge(&sources)?;
//! std::fs::write("merged.pdf", &result.bytes)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod config;
pub mod document;
pub mod error;
pub mod io;
pub mod job;
pub mod merge;
pub mod output;
pub mod request;
pub mod source;
pub mod utils;
pub mod validation;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::Config;
pub use document::DocumentHandle;
pub use error::{ErrorKind, PdfMergeError, Result};
pub use job::{JobOutput, JobRunner, JobStatus, MergeJob, RunnerConfig};
pub use merge::{MergeResult, MergeStatistics, Merger};
pub use request::{MergeManifest, MergeRequest, UploadedFile};
pub use source::{SourceId, SourceList};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
