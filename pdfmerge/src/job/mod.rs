//! Merge jobs and their lifecycle.
//!
//! A [`MergeJob`] owns the sources for one merge and moves through
//! `Pending -> Running -> Succeeded | Failed`. Sources can only be edited
//! while the job is pending, and a job runs at most once; to retry, take the
//! sources back with [`MergeJob::into_sources`] and build a new job.
//!
//! [`JobRunner`] drives a whole request end to end: staging uploads,
//! decoding, ordering, merging, and cleanup.

pub mod runner;
pub mod staging;

pub use runner::{JobOutput, JobRunner, PDF_MIME_TYPE, RunnerConfig};
pub use staging::{StagedFile, StagingArea};

use serde::Serialize;
use std::fmt;
use tracing::{info, warn};
use uuid::Uuid;

use crate::codec::PdfCodec;
use crate::document::DocumentHandle;
use crate::error::{ErrorKind, PdfMergeError, Result};
use crate::merge::{MergeResult, Merger};
use crate::source::{SourceId, SourceList};

/// Lifecycle state of a job, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Created, sources may still change.
    Pending,
    /// Merge in progress.
    Running,
    /// Merge finished and produced output.
    Succeeded,
    /// Merge failed.
    Failed,
}

impl JobStatus {
    /// Whether the job can no longer change state.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Lifecycle state of a job with its outcome.
#[derive(Debug, Clone)]
pub enum JobState {
    /// Created, sources may still change.
    Pending,
    /// Merge in progress.
    Running,
    /// Merge finished; holds the merged PDF.
    Succeeded(MergeResult),
    /// Merge failed; holds what went wrong.
    Failed(ErrorKind),
}

impl JobState {
    /// Status without payload.
    pub fn status(&self) -> JobStatus {
        match self {
            Self::Pending => JobStatus::Pending,
            Self::Running => JobStatus::Running,
            Self::Succeeded(_) => JobStatus::Succeeded,
            Self::Failed(_) => JobStatus::Failed,
        }
    }
}

/// One merge request from creation to completion.
#[derive(Debug)]
pub struct MergeJob<D> {
    id: Uuid,
    sources: SourceList<D>,
    output_name: String,
    state: JobState,
}

impl<D> MergeJob<D> {
    /// Create a pending job with no sources.
    pub fn new(output_name: impl Into<String>) -> Self {
        Self::with_sources(SourceList::new(), output_name)
    }

    /// Create a pending job over existing sources.
    pub fn with_sources(sources: SourceList<D>, output_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sources,
            output_name: output_name.into(),
            state: JobState::Pending,
        }
    }

    /// Use a caller-chosen id, e.g. to correlate with the request.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Job identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current status.
    pub fn status(&self) -> JobStatus {
        self.state.status()
    }

    /// Current state with outcome.
    pub fn state(&self) -> &JobState {
        &self.state
    }

    /// The job's sources, in merge order.
    pub fn sources(&self) -> &SourceList<D> {
        &self.sources
    }

    /// File name the merged PDF should be offered under.
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// Merged output, once the job has succeeded.
    pub fn output(&self) -> Option<&MergeResult> {
        match &self.state {
            JobState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    /// Consume the job and take its merged output.
    pub fn into_output(self) -> Option<MergeResult> {
        match self.state {
            JobState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    /// Consume the job and take its sources back, whatever its state.
    pub fn into_sources(self) -> SourceList<D> {
        self.sources
    }

    /// Append a source.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::JobNotPending`] once the job has started.
    pub fn add_source(&mut self, handle: DocumentHandle<D>) -> Result<SourceId> {
        self.ensure_pending()?;
        Ok(self.sources.append(handle))
    }

    /// Remove a source; unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::JobNotPending`] once the job has started.
    pub fn remove_source(&mut self, id: SourceId) -> Result<Option<DocumentHandle<D>>> {
        self.ensure_pending()?;
        Ok(self.sources.remove(id))
    }

    /// Move a source to a new position.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::JobNotPending`] once the job has started, or
    /// the errors of [`SourceList::move_to`].
    pub fn move_source(&mut self, id: SourceId, new_position: usize) -> Result<()> {
        self.ensure_pending()?;
        self.sources.move_to(id, new_position)
    }

    /// Run the merge.
    ///
    /// The job goes to `Running`, then to `Succeeded` with the merged PDF or
    /// to `Failed` with the error kind. The error itself is returned to the
    /// caller.
    ///
    /// # Errors
    ///
    /// Returns [`PdfMergeError::JobNotPending`] if the job already ran, or
    /// whatever [`Merger::merge`] reports.
    pub fn run<C>(&mut self, merger: &Merger<C>) -> Result<()>
    where
        C: PdfCodec<Document = D>,
    {
        self.ensure_pending()?;
        self.state = JobState::Running;

        match merger.merge(&self.sources) {
            Ok(result) => {
                info!(job_id = %self.id, pages = result.statistics.total_pages, "Job succeeded");
                self.state = JobState::Succeeded(result);
                Ok(())
            }
            Err(err) => {
                warn!(job_id = %self.id, error = %err, "Job failed");
                self.state = JobState::Failed(err.kind());
                Err(err)
            }
        }
    }

    fn ensure_pending(&self) -> Result<()> {
        match self.status() {
            JobStatus::Pending => Ok(()),
            state => Err(PdfMergeError::JobNotPending { state }),
        }
    }
}
