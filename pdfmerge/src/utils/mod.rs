//! Utilities for path collection and display formatting.

use crate::{Result, error::PdfMergeError};
use std::path::PathBuf;

/// Expand multiple glob patterns into filesystem paths.
///
/// Accepts anything iterable with items that convert to `&str`, e.g.:
/// `&[&str]`, `Vec<String>`, or `Vec<&str>`.
///
/// Returns a flattened list of resolved paths in pattern order. Patterns
/// without glob metacharacters are kept as literal paths even if they do not
/// exist, so a missing input is reported by the reader rather than silently
/// dropped.
///
/// Errors:
/// - Propagates `glob` parse errors.
/// - Propagates filesystem errors from glob iterator.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns.into_iter() {
        let pattern = pattern.as_ref();
        if is_literal(pattern) {
            resolved_paths.push(PathBuf::from(pattern));
        } else {
            resolved_paths.extend(collect_paths_for_pattern(pattern)?);
        }
    }

    Ok(resolved_paths)
}

fn is_literal(pattern: &str) -> bool {
    !pattern.contains(['*', '?', '['])
}

/// Expand a single glob pattern into filesystem paths, sorted by name.
///
/// Pattern examples:
/// - `"**/*.pdf"`
/// - `"./docs/*.pdf"`
fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut resolved_paths = Vec::new();

    let paths = glob::glob(pattern)
        .map_err(|err| PdfMergeError::invalid_config(format!("{pattern}: {err}")))?;

    for entry in paths {
        let path = entry.map_err(|err| PdfMergeError::other(err.to_string()))?;
        resolved_paths.push(path);
    }

    Ok(resolved_paths)
}

/// Format a byte count as a human-readable size.
///
/// ```
/// use pdfmerge::utils::format_file_size;
///
/// assert_eq!(format_file_size(1536), "1.50 KB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} bytes")
    }
}
