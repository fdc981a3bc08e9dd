//! Integration tests for the job lifecycle and staging cleanup.

use pdfmerge::codec::LopdfCodec;
use pdfmerge::job::StagingArea;
use pdfmerge::{DocumentHandle, JobStatus, MergeJob, MergeRequest, Merger, PdfMergeError};

use crate::common::{is_empty_dir, isolated_runner, page_markers, pdf_bytes, upload};

#[test]
fn test_job_runs_once() {
    let codec = LopdfCodec::new();
    let merger = Merger::new(codec);
    let mut job = MergeJob::new("out.pdf");

    for label in ["a", "b"] {
        let handle = DocumentHandle::decode(&codec, &pdf_bytes(label, 1), label).unwrap();
        job.add_source(handle).unwrap();
    }
    assert_eq!(job.status(), JobStatus::Pending);

    job.run(&merger).unwrap();
    assert_eq!(job.status(), JobStatus::Succeeded);
    assert_eq!(
        page_markers(&job.output().unwrap().bytes),
        vec!["a-p1", "b-p1"]
    );

    let err = job.run(&merger).unwrap_err();
    assert!(matches!(
        err,
        PdfMergeError::JobNotPending {
            state: JobStatus::Succeeded
        }
    ));
}

#[test]
fn test_failed_job_keeps_sources() {
    let codec = LopdfCodec::new();
    let mut job = MergeJob::new("out.pdf");
    for label in ["x", "y"] {
        let handle = DocumentHandle::decode(&codec, &pdf_bytes(label, 0), label).unwrap();
        job.add_source(handle).unwrap();
    }

    assert!(job.run(&Merger::new(codec)).is_err());
    assert_eq!(job.status(), JobStatus::Failed);

    let handle = DocumentHandle::decode(&codec, &pdf_bytes("z", 1), "z").unwrap();
    assert!(job.add_source(handle).is_err());
    assert_eq!(job.into_sources().len(), 2);
}

#[tokio::test]
async fn test_staging_removed_after_success() {
    let (runner, root) = isolated_runner();
    let request = MergeRequest::new(vec![upload("a", 1), upload("b", 1)]);

    runner.run_job(request).await.unwrap();

    assert!(is_empty_dir(root.path()));
}

#[tokio::test]
async fn test_staging_removed_after_decode_failure() {
    let (runner, root) = isolated_runner();
    let request = MergeRequest::new(vec![
        upload("a", 1),
        pdfmerge::UploadedFile::new("broken.pdf", b"not a pdf at all".to_vec()),
    ]);

    assert!(runner.run_job(request).await.is_err());

    assert!(is_empty_dir(root.path()));
}

#[tokio::test]
async fn test_staging_area_close() {
    let root = tempfile::TempDir::new().unwrap();
    let mut staging = StagingArea::create(Some(root.path())).unwrap();

    let staged = staging.stage("a.pdf", b"data").await.unwrap();
    assert!(staged.path.starts_with(staging.path()));
    assert_eq!(staging.read(&staged).await.unwrap(), b"data");

    staging.close().unwrap();
    assert!(is_empty_dir(root.path()));
}
