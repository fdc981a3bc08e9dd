//! Request validation for pdfmerge.
//!
//! This module holds the checks that run before any merge work starts:
//! - Explicit orderings must be permutations of the input indices
//! - Requested output names are reduced to a safe `.pdf` file name
//! - A dry-run [`MergePlan`] describes what a merge would produce
//!
//! # Examples
//!
//! ```
//! use pdfmerge::validation::{resolve_order, suggested_file_name};
//! use std::time::SystemTime;
//!
//! let order = resolve_order(Some(&[2, 0, 1][..]), 3).unwrap();
//! assert_eq!(order, vec![2, 0, 1]);
//!
//! let name = suggested_file_name(Some("reports/q3 summary"), SystemTime::now());
//! assert_eq!(name, "q3 summary.pdf");
//! ```

use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{PdfMergeError, Result};
use crate::source::SourceList;

/// Extension forced onto every output name.
const PDF_EXTENSION: &str = "pdf";

/// Resolve the merge order for `len` inputs.
///
/// Without an explicit order the inputs are merged in submission order.
/// An explicit order lists input indices in merge order: `[2, 0, 1]` puts the
/// third input first.
///
/// # Errors
///
/// Returns [`PdfMergeError::InvalidOrder`] if `order` is not a permutation of
/// `0..len`: wrong length, an index out of range, or an index repeated.
pub fn resolve_order(order: Option<&[usize]>, len: usize) -> Result<Vec<usize>> {
    let Some(order) = order else {
        return Ok((0..len).collect());
    };

    if order.len() != len {
        return Err(PdfMergeError::invalid_order(format!(
            "expected {len} indices, got {}",
            order.len()
        )));
    }

    let mut seen = vec![false; len];
    for &index in order {
        let slot = seen.get_mut(index).ok_or_else(|| {
            PdfMergeError::invalid_order(format!(
                "index {index} is out of range for {len} file(s)"
            ))
        })?;
        if *slot {
            return Err(PdfMergeError::invalid_order(format!(
                "index {index} appears more than once"
            )));
        }
        *slot = true;
    }

    Ok(order.to_vec())
}

/// File name to offer the merged PDF under.
///
/// A requested name is reduced to its last path component, stripped of
/// control characters and quotes, and given a `.pdf` extension (replacing
/// any other extension). Without a usable name the default is
/// `merged_<unix-millis>.pdf`.
pub fn suggested_file_name(requested: Option<&str>, now: SystemTime) -> String {
    requested
        .and_then(sanitize_file_name)
        .unwrap_or_else(|| default_file_name(now))
}

fn sanitize_file_name(requested: &str) -> Option<String> {
    let base = requested.rsplit(['/', '\\']).next().unwrap_or_default();
    let base: String = base
        .chars()
        .filter(|c| !c.is_control() && *c != '"')
        .collect();
    let base = base.trim();

    if base.is_empty() || base == "." || base == ".." {
        return None;
    }

    let stem = match base.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => {
            if extension.eq_ignore_ascii_case(PDF_EXTENSION) {
                return Some(base.to_string());
            }
            stem
        }
        _ => base,
    };

    Some(format!("{stem}.{PDF_EXTENSION}"))
}

fn default_file_name(now: SystemTime) -> String {
    let millis = now
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    format!("merged_{millis}.{PDF_EXTENSION}")
}

/// One source as it would be merged.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedSource {
    /// Merge position, 0-based.
    pub position: usize,

    /// Name the file was submitted under.
    pub name: String,

    /// Number of pages it contributes.
    pub page_count: usize,
}

impl PlannedSource {
    /// Whether the source will be skipped for having no pages.
    pub fn is_skipped(&self) -> bool {
        self.page_count == 0
    }
}

/// What a merge would produce, computed without producing it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergePlan {
    /// Sources in merge order.
    pub sources: Vec<PlannedSource>,

    /// Total number of pages in the output.
    pub total_pages: usize,

    /// File name the output would be offered under.
    pub output_name: String,
}

impl MergePlan {
    /// Describe the merge of `sources`.
    pub fn from_sources<D>(sources: &SourceList<D>, output_name: impl Into<String>) -> Self {
        let planned = sources
            .entries()
            .iter()
            .map(|entry| PlannedSource {
                position: entry.position(),
                name: entry.handle().source_name().to_string(),
                page_count: entry.handle().page_count(),
            })
            .collect();

        Self {
            sources: planned,
            total_pages: sources.total_pages(),
            output_name: output_name.into(),
        }
    }

    /// Number of sources that contribute pages.
    pub fn files_merged(&self) -> usize {
        self.sources.iter().filter(|s| !s.is_skipped()).count()
    }

    /// Number of sources skipped for having no pages.
    pub fn files_skipped(&self) -> usize {
        self.sources.len() - self.files_merged()
    }
}
