//! Reading input files from disk.
//!
//! The reader turns paths into [`UploadedFile`]s, the same shape a network
//! upload would have, so the CLI feeds the job runner exactly like any other
//! caller. Decoding happens later, inside the job.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::io::reader::PdfReader;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let paths = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! let (files, stats) = reader.read_all(&paths, 4).await?;
//! println!("Read {} files ({})", files.len(), stats.format_total_size());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::error::{PdfMergeError, Result};
use crate::request::UploadedFile;
use crate::utils::format_file_size;

/// Statistics for a batch read.
#[derive(Debug, Clone)]
pub struct ReadStatistics {
    /// Number of files read.
    pub files_read: usize,

    /// Total size of the files read.
    pub total_size: u64,

    /// Total time taken.
    pub total_time: Duration,
}

impl ReadStatistics {
    /// Format total size as human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size)
    }
}

/// Reads input files into uploads.
#[derive(Debug, Clone, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new reader.
    pub fn new() -> Self {
        Self
    }

    /// Read a single file.
    ///
    /// The upload is named after the file name of `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist
    /// - The path is not a regular file or cannot be read
    pub async fn read(&self, path: &Path) -> Result<UploadedFile> {
        if !path.exists() {
            return Err(PdfMergeError::file_not_found(path.to_path_buf()));
        }

        let bytes =
            tokio::fs::read(path)
                .await
                .map_err(|source| PdfMergeError::FailedToReadInput {
                    path: path.to_path_buf(),
                    source,
                })?;

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        debug!(path = %path.display(), size = bytes.len(), "Read input file");
        Ok(UploadedFile::new(name, bytes))
    }

    /// Read files one at a time, stopping at the first failure.
    pub async fn read_sequential(&self, paths: &[PathBuf]) -> Result<Vec<UploadedFile>> {
        let mut files = Vec::with_capacity(paths.len());

        for path in paths {
            files.push(self.read(path).await?);
        }

        Ok(files)
    }

    /// Read files concurrently with at most `workers` reads in flight.
    ///
    /// Results keep the order of `paths`.
    pub async fn read_parallel(
        &self,
        paths: &[PathBuf],
        workers: usize,
    ) -> Result<Vec<UploadedFile>> {
        use futures::stream::{self, StreamExt, TryStreamExt};

        let workers = workers.max(1);

        stream::iter(paths.iter().map(|path| self.read(path)))
            .buffered(workers)
            .try_collect()
            .await
    }

    /// Read all files, choosing sequential or concurrent reads by batch
    /// size.
    ///
    /// # Errors
    ///
    /// Returns the first failure; no partial result is returned.
    pub async fn read_all(
        &self,
        paths: &[PathBuf],
        max_workers: usize,
    ) -> Result<(Vec<UploadedFile>, ReadStatistics)> {
        let start = Instant::now();

        // Use sequential reads for small batches
        let files = if paths.len() <= 3 {
            self.read_sequential(paths).await?
        } else {
            self.read_parallel(paths, max_workers).await?
        };

        let stats = ReadStatistics {
            files_read: files.len(),
            total_size: files.iter().map(UploadedFile::size).sum(),
            total_time: start.elapsed(),
        };

        Ok((files, stats))
    }
}
