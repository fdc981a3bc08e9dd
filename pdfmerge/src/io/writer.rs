//! Writing merged output to disk.
//!
//! Writes are atomic: bytes go to a temporary file next to the target,
//! which is then persisted over the final path. A failed write never leaves a
//! partial file at the output path.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::io::writer::PdfWriter;
//! use std::path::Path;
//!
//! # async fn example(bytes: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = PdfWriter::new();
//! writer.save(&bytes, Path::new("output.pdf")).await?;
//! # Ok(())
//! # }
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;
use tracing::debug;

use crate::error::{PdfMergeError, Result};
use crate::utils::format_file_size;

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Writes merged PDF bytes to files.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter;

impl PdfWriter {
    /// Create a new writer.
    pub fn new() -> Self {
        Self
    }

    /// Save `bytes` to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Output directory doesn't exist
    /// - Insufficient permissions
    /// - Disk full
    pub async fn save(&self, bytes: &[u8], path: &Path) -> Result<()> {
        self.save_with_stats(bytes, path).await.map(|_| ())
    }

    /// Save `bytes` to `path` and return statistics about the operation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfmerge::io::writer::PdfWriter;
    /// # use std::path::Path;
    /// # async fn example(bytes: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
    /// let writer = PdfWriter::new();
    /// let stats = writer.save_with_stats(&bytes, Path::new("output.pdf")).await?;
    /// println!("Wrote {} in {:?}", stats.format_file_size(), stats.write_time);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn save_with_stats(&self, bytes: &[u8], path: &Path) -> Result<WriteStatistics> {
        let path_buf = path.to_path_buf();
        let bytes = bytes.to_vec();

        let stats = task::spawn_blocking(move || {
            let start = Instant::now();
            let failed = |source: std::io::Error| PdfMergeError::FailedToWrite {
                path: path_buf.clone(),
                source,
            };

            let parent = match path_buf.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };

            let mut temp = tempfile::NamedTempFile::new_in(&parent).map_err(failed)?;
            temp.write_all(&bytes).map_err(failed)?;
            temp.flush().map_err(failed)?;
            temp.persist(&path_buf).map_err(|err| failed(err.error))?;

            debug!(path = %path_buf.display(), size = bytes.len(), "Wrote output file");

            Ok::<_, PdfMergeError>(WriteStatistics {
                write_time: start.elapsed(),
                file_size: bytes.len() as u64,
                output_path: path_buf.clone(),
            })
        })
        .await
        .map_err(|e| PdfMergeError::other(format!("Write task failed: {e}")))??;

        Ok(stats)
    }

    /// Check that the output directory exists.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::InvalidConfig`] if the parent directory of
    /// `path` is missing.
    pub async fn can_write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !tokio::fs::metadata(parent)
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false)
        {
            return Err(PdfMergeError::invalid_config(format!(
                "Output directory does not exist: {}",
                parent.display()
            )));
        }

        Ok(())
    }

    /// Check if output file exists.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }
}
