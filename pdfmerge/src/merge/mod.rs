//! PDF merge orchestration.
//!
//! [`Merger`] turns an ordered [`SourceList`](crate::source::SourceList)
//! into a single serialized PDF.

pub mod merger;

pub use merger::{MIN_SOURCES, MergeResult, MergeStatistics, Merger};

use crate::codec::LopdfCodec;
use crate::error::Result;
use crate::source::SourceList;

/// Merge lopdf documents with the default codec.
///
/// Shorthand for `Merger::new(LopdfCodec::new()).merge(sources)`.
pub fn merge_sources(sources: &SourceList<lopdf::Document>) -> Result<MergeResult> {
    Merger::new(LopdfCodec::new()).merge(sources)
}
