//! Transient storage for uploaded files.
//!
//! Each job gets its own [`StagingArea`], a private temporary directory that
//! holds the raw upload bytes between receipt and decoding. The directory is
//! removed when the area is closed or dropped, including when the job fails
//! or the task unwinds.

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

use crate::error::{PdfMergeError, Result};

const STAGING_PREFIX: &str = "pdfmerge-job-";

/// A file held in a [`StagingArea`].
#[derive(Debug, Clone)]
pub struct StagedFile {
    /// Name the file was uploaded under.
    pub name: String,

    /// Location inside the staging directory.
    pub path: PathBuf,

    /// Size in bytes.
    pub size: u64,
}

/// Per-job temporary directory.
#[derive(Debug)]
pub struct StagingArea {
    dir: TempDir,
    staged: usize,
}

impl StagingArea {
    /// Create a staging directory under `root`, or the system temp dir.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::Staging`] if the directory cannot be created.
    pub fn create(root: Option<&Path>) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(STAGING_PREFIX);

        let dir = match root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(PdfMergeError::staging)?;

        debug!(path = %dir.path().display(), "Created staging area");
        Ok(Self { dir, staged: 0 })
    }

    /// Location of the staging directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Number of files staged so far.
    pub fn staged_count(&self) -> usize {
        self.staged
    }

    /// Write upload bytes into the staging directory.
    ///
    /// Staged files are named by arrival order; the upload name is kept only
    /// as metadata and never touches the filesystem.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::Staging`] on I/O failure.
    pub async fn stage(&mut self, name: &str, bytes: &[u8]) -> Result<StagedFile> {
        let path = self.dir.path().join(format!("{:04}.pdf", self.staged));
        tokio::fs::write(&path, bytes)
            .await
            .map_err(PdfMergeError::staging)?;
        self.staged += 1;

        Ok(StagedFile {
            name: name.to_string(),
            path,
            size: bytes.len() as u64,
        })
    }

    /// Read a staged file back.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::Staging`] on I/O failure.
    pub async fn read(&self, file: &StagedFile) -> Result<Vec<u8>> {
        tokio::fs::read(&file.path)
            .await
            .map_err(PdfMergeError::staging)
    }

    /// Remove the staging directory and everything in it.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::Staging`] if removal fails.
    pub fn close(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close().map_err(PdfMergeError::staging)?;
        debug!(path = %path.display(), "Removed staging area");
        Ok(())
    }
}
