//! Error types for pdfmerge.
//!
//! Every failure a merge job can hit is a variant of [`PdfMergeError`].
//! Errors are returned as values all the way to the boundary layer; nothing
//! is allowed to escape the job runner as a panic.
//!
//! # Error Categories
//!
//! - **Input Errors**: undecodable uploads, malformed orderings, too few sources
//! - **Merge Errors**: page copy failures, empty results, serialization failures
//! - **Job Errors**: edits or re-runs on a job that already left `Pending`
//! - **I/O Errors**: staging, reading inputs, writing the output

use serde::Serialize;
use std::io;
use std::path::PathBuf;

use crate::job::JobStatus;
use crate::source::SourceId;

/// Result type alias for pdfmerge operations.
pub type Result<T> = std::result::Result<T, PdfMergeError>;

/// Main error type for pdfmerge operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfMergeError {
    /// Fewer than two sources were supplied to a merge.
    #[error("At least 2 PDF files are required to merge, got {count}")]
    InsufficientSources {
        /// Number of sources that were supplied.
        count: usize,
    },

    /// An uploaded file could not be decoded as a PDF.
    #[error("File '{name}' is not a readable PDF\n  Reason: {reason}")]
    InvalidDocument {
        /// Name of the offending upload.
        name: String,
        /// Decoder message.
        reason: String,
    },

    /// A source decoded fine but its pages could not be copied.
    #[error("File '{name}' (position {index}) could not be read while merging\n  Reason: {reason}")]
    SourceUnreadable {
        /// Merge position of the failing source.
        index: usize,
        /// Name of the failing source.
        name: String,
        /// Codec message.
        reason: String,
    },

    /// An explicit ordering is not a permutation of the input indices.
    #[error("Invalid order: {reason}")]
    InvalidOrder {
        /// What is wrong with the ordering.
        reason: String,
    },

    /// Every source contributed zero pages.
    #[error("All input PDFs are empty; nothing to merge")]
    EmptyResult,

    /// A move targeted a position outside the source list.
    #[error("Position {position} is out of range for a list of {len} source(s)")]
    OutOfRange {
        /// Requested position.
        position: usize,
        /// Current list length.
        len: usize,
    },

    /// A source id that is not in the list.
    #[error("Unknown source: {id}")]
    UnknownSource {
        /// The id that was not found.
        id: SourceId,
    },

    /// The job already left the `Pending` state.
    #[error("Job is {state}; only pending jobs can be edited or run")]
    JobNotPending {
        /// State the job was in.
        state: JobStatus,
    },

    /// The merged document could not be serialized.
    #[error("Failed to serialize merged PDF: {reason}")]
    EncodeFailed {
        /// Codec message.
        reason: String,
    },

    /// Transient storage for uploads could not be used.
    #[error("Failed to stage uploaded files: {source}")]
    Staging {
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The request payload was malformed.
    #[error("Invalid merge request: {message}")]
    InvalidRequest {
        /// Description of the problem.
        message: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Input file was not found.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input file exists but could not be read.
    #[error("Failed to read input file: {}\n  Reason: {source}", path.display())]
    FailedToReadInput {
        /// Path to the input file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  Use --force to overwrite or choose a different output path",
        path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to write the output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

/// Stable, copyable discriminant of a [`PdfMergeError`].
///
/// This is what a failed job keeps, and what the boundary layer reports as a
/// machine-readable code.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InsufficientSources,
    InvalidDocument,
    SourceUnreadable,
    InvalidOrder,
    EmptyResult,
    OutOfRange,
    UnknownSource,
    JobNotPending,
    EncodeFailed,
    Staging,
    InvalidRequest,
    InvalidConfig,
    FileNotFound,
    FailedToReadInput,
    OutputExists,
    FailedToWrite,
    Cancelled,
    Io,
    Other,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::InsufficientSources => "insufficient_sources",
            Self::InvalidDocument => "invalid_document",
            Self::SourceUnreadable => "source_unreadable",
            Self::InvalidOrder => "invalid_order",
            Self::EmptyResult => "empty_result",
            Self::OutOfRange => "out_of_range",
            Self::UnknownSource => "unknown_source",
            Self::JobNotPending => "job_not_pending",
            Self::EncodeFailed => "encode_failed",
            Self::Staging => "staging",
            Self::InvalidRequest => "invalid_request",
            Self::InvalidConfig => "invalid_config",
            Self::FileNotFound => "file_not_found",
            Self::FailedToReadInput => "failed_to_read_input",
            Self::OutputExists => "output_exists",
            Self::FailedToWrite => "failed_to_write",
            Self::Cancelled => "cancelled",
            Self::Io => "io",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

impl From<serde_json::Error> for PdfMergeError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_request(err.to_string())
    }
}

impl PdfMergeError {
    /// Create an InvalidDocument error.
    pub fn invalid_document(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDocument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a SourceUnreadable error.
    pub fn source_unreadable(
        index: usize,
        name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::SourceUnreadable {
            index,
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidOrder error.
    pub fn invalid_order(reason: impl Into<String>) -> Self {
        Self::InvalidOrder {
            reason: reason.into(),
        }
    }

    /// Create an InvalidRequest error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create a Staging error.
    pub fn staging(source: io::Error) -> Self {
        Self::Staging { source }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// The copyable kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientSources { .. } => ErrorKind::InsufficientSources,
            Self::InvalidDocument { .. } => ErrorKind::InvalidDocument,
            Self::SourceUnreadable { .. } => ErrorKind::SourceUnreadable,
            Self::InvalidOrder { .. } => ErrorKind::InvalidOrder,
            Self::EmptyResult => ErrorKind::EmptyResult,
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
            Self::UnknownSource { .. } => ErrorKind::UnknownSource,
            Self::JobNotPending { .. } => ErrorKind::JobNotPending,
            Self::EncodeFailed { .. } => ErrorKind::EncodeFailed,
            Self::Staging { .. } => ErrorKind::Staging,
            Self::InvalidRequest { .. } => ErrorKind::InvalidRequest,
            Self::InvalidConfig { .. } => ErrorKind::InvalidConfig,
            Self::FileNotFound { .. } => ErrorKind::FileNotFound,
            Self::FailedToReadInput { .. } => ErrorKind::FailedToReadInput,
            Self::OutputExists { .. } => ErrorKind::OutputExists,
            Self::FailedToWrite { .. } => ErrorKind::FailedToWrite,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Io { .. } => ErrorKind::Io,
            Self::Other { .. } => ErrorKind::Other,
        }
    }

    /// Check if this error was caused by the submitted input.
    ///
    /// Returns true when retrying with corrected input can succeed; the
    /// remaining errors come from the environment (disk, permissions).
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InsufficientSources { .. }
                | Self::InvalidDocument { .. }
                | Self::SourceUnreadable { .. }
                | Self::InvalidOrder { .. }
                | Self::EmptyResult
                | Self::OutOfRange { .. }
                | Self::UnknownSource { .. }
                | Self::InvalidRequest { .. }
                | Self::InvalidConfig { .. }
                | Self::FileNotFound { .. }
        )
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InsufficientSources { .. } => 1,
            Self::InvalidDocument { .. } => 3,
            Self::SourceUnreadable { .. } => 3,
            Self::InvalidOrder { .. } => 1,
            Self::EmptyResult => 6,
            Self::OutOfRange { .. } => 1,
            Self::UnknownSource { .. } => 1,
            Self::JobNotPending { .. } => 6,
            Self::EncodeFailed { .. } => 6,
            Self::Staging { .. } => 5,
            Self::InvalidRequest { .. } => 1,
            Self::InvalidConfig { .. } => 1,
            Self::FileNotFound { .. } => 2,
            Self::FailedToReadInput { .. } => 2,
            Self::OutputExists { .. } => 4,
            Self::FailedToWrite { .. } => 5,
            Self::Cancelled => 130, // Standard exit code for SIGINT
            Self::Io { .. } => 5,
            Self::Other { .. } => 1,
        }
    }
}
