//! Merge request payloads.
//!
//! [`MergeRequest`] is what a caller hands to
//! [`JobRunner::run_job`](crate::job::JobRunner::run_job): uploaded files in
//! submission order, an optional merge order, and an optional output name.
//!
//! [`MergeManifest`] is the on-disk JSON form used by the CLI:
//!
//! ```json
//! {
//!   "files": ["cover.pdf", "body.pdf", "appendix.pdf"],
//!   "order": [0, 2, 1],
//!   "output": "report.pdf"
//! }
//! ```
//!
//! Relative file paths are resolved against the manifest's directory.
//! Unknown fields are rejected.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PdfMergeError, Result};

/// One uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Name the file was submitted under.
    pub name: String,

    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Create an upload.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// A request to merge uploaded files.
#[derive(Debug, Clone, Default)]
pub struct MergeRequest {
    /// Uploaded files in submission order.
    pub files: Vec<UploadedFile>,

    /// Input indices in merge order; submission order when `None`.
    pub order: Option<Vec<usize>>,

    /// Requested output file name.
    pub output_name: Option<String>,
}

impl MergeRequest {
    /// Request merging `files` in submission order.
    pub fn new(files: Vec<UploadedFile>) -> Self {
        Self {
            files,
            order: None,
            output_name: None,
        }
    }

    /// Set an explicit merge order.
    pub fn with_order(mut self, order: Vec<usize>) -> Self {
        self.order = Some(order);
        self
    }

    /// Set the requested output name.
    pub fn with_output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }
}

/// JSON description of a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeManifest {
    /// Input files in submission order.
    pub files: Vec<PathBuf>,

    /// Input indices in merge order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<usize>>,

    /// Output file name or path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl MergeManifest {
    /// Parse a manifest from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::InvalidRequest`] for malformed JSON, missing
    /// `files`, or unrecognized fields.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a manifest file, resolving relative paths against its
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PdfMergeError::file_not_found(path.to_path_buf()));
        }

        let json = tokio::fs::read_to_string(path).await.map_err(|source| {
            PdfMergeError::FailedToReadInput {
                path: path.to_path_buf(),
                source,
            }
        })?;

        let manifest: Self = serde_json::from_str(&json).map_err(|err| {
            PdfMergeError::invalid_request(format!("{}: {err}", path.display()))
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(manifest.resolve_relative_to(base))
    }

    /// Make relative file paths relative to `base`.
    pub fn resolve_relative_to(mut self, base: &Path) -> Self {
        for file in &mut self.files {
            if file.is_relative() {
                *file = base.join(&*file);
            }
        }
        self
    }
}
