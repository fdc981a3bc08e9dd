//! Core PDF merging implementation.
//!
//! This module implements the merge algorithm: walk a [`SourceList`] in
//! order, append every page of every non-empty source to a fresh document,
//! and serialize the result.

use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

use crate::codec::{LopdfCodec, PdfCodec};
use crate::error::{PdfMergeError, Result};
use crate::source::SourceList;
use crate::utils::format_file_size;

/// Minimum number of sources a merge accepts.
pub const MIN_SOURCES: usize = 2;

/// Statistics about a merge operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeStatistics {
    /// Number of sources that contributed pages.
    pub files_merged: usize,

    /// Number of sources skipped because they have no pages.
    pub files_skipped: usize,

    /// Total number of pages in the merged document.
    pub total_pages: usize,

    /// Size of the serialized output in bytes.
    pub output_size: u64,

    /// Total time taken for merge.
    pub merge_time: Duration,
}

impl MergeStatistics {
    /// Format output size as human-readable string.
    pub fn format_output_size(&self) -> String {
        format_file_size(self.output_size)
    }
}

/// Result of a merge operation.
#[derive(Debug, Clone)]
pub struct MergeResult {
    /// The serialized merged PDF.
    pub bytes: Vec<u8>,

    /// Statistics about the merge.
    pub statistics: MergeStatistics,
}

/// PDF merger that combines multiple documents.
#[derive(Debug, Clone, Default)]
pub struct Merger<C = LopdfCodec> {
    codec: C,
}

impl<C: PdfCodec> Merger<C> {
    /// Create a merger using `codec`.
    pub fn new(codec: C) -> Self {
        Self { codec }
    }

    /// The codec this merger uses.
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Merge the sources into one PDF, in list order.
    ///
    /// Every page of every source is appended to a new document; sources
    /// with zero pages are skipped. Sources are never modified.
    ///
    /// # Arguments
    ///
    /// * `sources` - Documents to merge, in merge order
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Fewer than [`MIN_SOURCES`] sources are given
    /// - A source's pages cannot be copied ([`PdfMergeError::SourceUnreadable`],
    ///   naming its position)
    /// - Every source is empty ([`PdfMergeError::EmptyResult`])
    /// - The result cannot be serialized
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use pdfmerge::codec::LopdfCodec;
    /// # use pdfmerge::merge::Merger;
    /// # use pdfmerge::source::SourceList;
    /// # fn example(sources: SourceList<lopdf::Document>) -> pdfmerge::Result<()> {
    /// let merger = Merger::new(LopdfCodec::new());
    /// let result = merger.merge(&sources)?;
    /// println!("Merged {} files into {} pages",
    ///          result.statistics.files_merged,
    ///          result.statistics.total_pages);
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip_all, fields(sources = sources.len()))]
    pub fn merge(&self, sources: &SourceList<C::Document>) -> Result<MergeResult> {
        let merge_start = Instant::now();

        if sources.len() < MIN_SOURCES {
            return Err(PdfMergeError::InsufficientSources {
                count: sources.len(),
            });
        }

        let mut output = self.codec.new_document();
        let mut files_merged = 0;
        let mut files_skipped = 0;

        for (index, handle) in sources.snapshot_ordered().into_iter().enumerate() {
            if handle.is_empty() {
                debug!(index, source = handle.source_name(), "Skipping source with no pages");
                files_skipped += 1;
                continue;
            }

            let pages: Vec<usize> = (0..handle.page_count()).collect();
            self.codec
                .copy_pages(handle.document(), &pages, &mut output)
                .map_err(|err| {
                    PdfMergeError::source_unreadable(index, handle.source_name(), err.message())
                })?;

            info!(
                index,
                source = handle.source_name(),
                pages = handle.page_count(),
                "Appended source"
            );
            files_merged += 1;
        }

        let total_pages = self.codec.page_count(&output);
        if total_pages == 0 {
            return Err(PdfMergeError::EmptyResult);
        }

        let bytes = self
            .codec
            .encode(output)
            .map_err(|err| PdfMergeError::EncodeFailed {
                reason: err.message().to_string(),
            })?;

        let statistics = MergeStatistics {
            files_merged,
            files_skipped,
            total_pages,
            output_size: bytes.len() as u64,
            merge_time: merge_start.elapsed(),
        };

        info!(
            files = files_merged,
            skipped = files_skipped,
            pages = total_pages,
            size = %statistics.format_output_size(),
            "Merge complete"
        );

        Ok(MergeResult { bytes, statistics })
    }
}
