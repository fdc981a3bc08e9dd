//! End-to-end execution of merge requests.
//!
//! [`JobRunner::run_job`] takes a [`MergeRequest`] through validation,
//! staging, decoding, ordering and merging, and hands back the merged PDF
//! with a suggested file name. Every request gets its own staging area and
//! source list; the runner itself only holds immutable configuration, so one
//! runner can serve any number of concurrent requests.
//!
//! Decoding and merging are CPU bound and run on tokio's blocking pool, one
//! step at a time in source order.
//!
//! # Examples
//!
//! ```no_run
//! use pdfmerge::job::{JobRunner, RunnerConfig};
//! use pdfmerge::request::{MergeRequest, UploadedFile};
//!
//! # async fn example(a: Vec<u8>, b: Vec<u8>) -> pdfmerge::Result<()> {
//! let runner = JobRunner::new(RunnerConfig::default());
//! let request = MergeRequest::new(vec![
//!     UploadedFile::new("a.pdf", a),
//!     UploadedFile::new("b.pdf", b),
//! ])
//! .with_order(vec![1, 0]);
//!
//! let output = runner.run_job(request).await?;
//! println!("{} ({} pages)", output.suggested_file_name, output.statistics.total_pages);
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::task::{self, JoinError};
use tracing::{Span, debug, field, info, instrument, warn};
use uuid::Uuid;

use super::MergeJob;
use super::staging::StagingArea;
use crate::codec::{LopdfCodec, PdfCodec};
use crate::document::DocumentHandle;
use crate::error::{PdfMergeError, Result};
use crate::merge::{MIN_SOURCES, MergeStatistics, Merger};
use crate::request::{MergeRequest, UploadedFile};
use crate::source::SourceList;
use crate::validation::{MergePlan, resolve_order, suggested_file_name};

/// MIME type of merged output.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Runner settings.
#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    /// Directory under which per-request staging directories are created.
    /// The system temp dir is used when unset.
    pub staging_root: Option<PathBuf>,
}

impl RunnerConfig {
    /// Stage uploads under `root`.
    pub fn with_staging_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.staging_root = Some(root.into());
        self
    }
}

/// Output of a successful job.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobOutput {
    /// Identifier of the job that produced this output.
    pub job_id: Uuid,

    /// The merged PDF.
    #[serde(skip)]
    pub bytes: Vec<u8>,

    /// File name to offer the PDF under.
    pub suggested_file_name: String,

    /// Statistics about the merge.
    pub statistics: MergeStatistics,
}

impl JobOutput {
    /// MIME type of the output.
    pub fn content_type(&self) -> &'static str {
        PDF_MIME_TYPE
    }

    /// `Content-Disposition` value offering the output as a download.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.suggested_file_name)
    }
}

/// Executes merge requests.
#[derive(Debug, Clone)]
pub struct JobRunner<C = LopdfCodec> {
    merger: Arc<Merger<C>>,
    config: RunnerConfig,
}

impl JobRunner<LopdfCodec> {
    /// Create a runner backed by `lopdf`.
    pub fn new(config: RunnerConfig) -> Self {
        Self::with_codec(LopdfCodec::new(), config)
    }
}

impl Default for JobRunner<LopdfCodec> {
    fn default() -> Self {
        Self::new(RunnerConfig::default())
    }
}

impl<C> JobRunner<C>
where
    C: PdfCodec + Send + Sync + 'static,
    C::Document: Send + 'static,
{
    /// Create a runner backed by `codec`.
    pub fn with_codec(codec: C, config: RunnerConfig) -> Self {
        Self {
            merger: Arc::new(Merger::new(codec)),
            config,
        }
    }

    /// Runner settings.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Run a merge request to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `order` is not a permutation of the file indices ([`PdfMergeError::InvalidOrder`])
    /// - Fewer than two files are submitted ([`PdfMergeError::InsufficientSources`])
    /// - A file cannot be decoded ([`PdfMergeError::InvalidDocument`])
    /// - Staging fails ([`PdfMergeError::Staging`])
    /// - The merge itself fails
    ///
    /// The staging area is removed on every path.
    #[instrument(skip_all, fields(job_id = field::Empty, files = request.files.len()))]
    pub async fn run_job(&self, request: MergeRequest) -> Result<JobOutput> {
        let job_id = Uuid::new_v4();
        Span::current().record("job_id", field::display(job_id));

        let (files, order, output_name) = open_request(request)?;
        let mut staging = StagingArea::create(self.config.staging_root.as_deref())?;

        let outcome = self
            .merge_staged(job_id, &mut staging, files, &order, output_name)
            .await;
        close_staging(staging);

        outcome
    }

    /// Validate, stage and decode a request, and describe the merge it would
    /// perform without performing it.
    ///
    /// # Errors
    ///
    /// The same errors as [`JobRunner::run_job`] up to the merge, plus
    /// [`PdfMergeError::EmptyResult`] when no file has pages.
    #[instrument(skip_all, fields(files = request.files.len()))]
    pub async fn plan(&self, request: MergeRequest) -> Result<MergePlan> {
        let (files, order, output_name) = open_request(request)?;
        let mut staging = StagingArea::create(self.config.staging_root.as_deref())?;

        let outcome = self
            .decode_staged(&mut staging, files, &order)
            .await
            .and_then(|sources| {
                let plan = MergePlan::from_sources(
                    &sources,
                    suggested_file_name(output_name.as_deref(), SystemTime::now()),
                );
                if plan.total_pages == 0 {
                    return Err(PdfMergeError::EmptyResult);
                }
                Ok(plan)
            });
        close_staging(staging);

        outcome
    }

    async fn merge_staged(
        &self,
        job_id: Uuid,
        staging: &mut StagingArea,
        files: Vec<UploadedFile>,
        order: &[usize],
        output_name: Option<String>,
    ) -> Result<JobOutput> {
        let sources = self.decode_staged(staging, files, order).await?;

        let output_name = suggested_file_name(output_name.as_deref(), SystemTime::now());
        let mut job = MergeJob::with_sources(sources, output_name).with_id(job_id);

        let merger = Arc::clone(&self.merger);
        let (job, outcome) = task::spawn_blocking(move || {
            let outcome = job.run(&*merger);
            (job, outcome)
        })
        .await
        .map_err(worker_failed)?;
        outcome?;

        let suggested_file_name = job.output_name().to_string();
        let result = job
            .into_output()
            .ok_or_else(|| PdfMergeError::other("merge job finished without output"))?;

        info!(
            output = %suggested_file_name,
            pages = result.statistics.total_pages,
            "Merge job complete"
        );

        Ok(JobOutput {
            job_id,
            bytes: result.bytes,
            suggested_file_name,
            statistics: result.statistics,
        })
    }

    /// Stage and decode every upload, then arrange the handles per `order`.
    async fn decode_staged(
        &self,
        staging: &mut StagingArea,
        files: Vec<UploadedFile>,
        order: &[usize],
    ) -> Result<SourceList<C::Document>> {
        let mut handles = Vec::with_capacity(files.len());

        for UploadedFile { name, bytes } in files {
            let staged = staging.stage(&name, &bytes).await?;
            drop(bytes);
            debug!(name = %staged.name, size = staged.size, "Staged upload");

            let bytes = staging.read(&staged).await?;
            let merger = Arc::clone(&self.merger);
            let handle = task::spawn_blocking(move || {
                DocumentHandle::decode(merger.codec(), &bytes, name)
            })
            .await
            .map_err(worker_failed)??;

            debug!(
                name = handle.source_name(),
                pages = handle.page_count(),
                "Decoded upload"
            );
            handles.push(Some(handle));
        }

        let mut sources = SourceList::new();
        for &index in order {
            if let Some(handle) = handles.get_mut(index).and_then(Option::take) {
                sources.append(handle);
            }
        }

        Ok(sources)
    }
}

/// Check the parts of a request that need no decoding.
fn open_request(request: MergeRequest) -> Result<(Vec<UploadedFile>, Vec<usize>, Option<String>)> {
    let MergeRequest {
        files,
        order,
        output_name,
    } = request;

    let order = resolve_order(order.as_deref(), files.len())?;
    if files.len() < MIN_SOURCES {
        return Err(PdfMergeError::InsufficientSources { count: files.len() });
    }

    Ok((files, order, output_name))
}

fn close_staging(staging: StagingArea) {
    if let Err(err) = staging.close() {
        warn!(error = %err, "Failed to remove staging area");
    }
}

fn worker_failed(err: JoinError) -> PdfMergeError {
    PdfMergeError::other(format!("merge worker failed: {err}"))
}
