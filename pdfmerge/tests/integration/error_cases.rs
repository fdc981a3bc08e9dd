//! Integration tests for error handling.

use pdfmerge::io::PdfReader;
use pdfmerge::{ErrorKind, MergeRequest, PdfMergeError, UploadedFile};
use rstest::rstest;
use std::path::PathBuf;

use crate::common::{is_empty_dir, isolated_runner, markers, page_markers, upload};

#[tokio::test]
async fn test_single_file_is_rejected() {
    let (runner, root) = isolated_runner();

    let err = runner
        .run_job(MergeRequest::new(vec![upload("a", 3)]))
        .await
        .unwrap_err();

    assert!(matches!(err, PdfMergeError::InsufficientSources { count: 1 }));
    assert!(is_empty_dir(root.path()));
}

#[tokio::test]
async fn test_no_files_is_rejected() {
    let (runner, _root) = isolated_runner();

    let err = runner.run_job(MergeRequest::default()).await.unwrap_err();
    assert!(matches!(err, PdfMergeError::InsufficientSources { count: 0 }));
}

#[tokio::test]
async fn test_undecodable_upload_names_file() {
    let (runner, root) = isolated_runner();
    let request = MergeRequest::new(vec![
        upload("a", 1),
        UploadedFile::new("notes.txt", b"just some text".to_vec()),
    ]);

    let err = runner.run_job(request).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidDocument);
    assert!(err.to_string().contains("notes.txt"));
    assert!(err.is_input_error());
    assert!(is_empty_dir(root.path()));
}

#[tokio::test]
async fn test_empty_upload_is_invalid() {
    let (runner, _root) = isolated_runner();
    let request = MergeRequest::new(vec![
        upload("a", 1),
        UploadedFile::new("empty.pdf", Vec::new()),
    ]);

    let err = runner.run_job(request).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidDocument);
}

#[rstest]
#[case(vec![0])]
#[case(vec![0, 1, 2])]
#[case(vec![0, 0])]
#[case(vec![0, 5])]
#[tokio::test]
async fn test_invalid_order(#[case] order: Vec<usize>) {
    let (runner, root) = isolated_runner();
    let request = MergeRequest::new(vec![upload("a", 1), upload("b", 1)]).with_order(order);

    let err = runner.run_job(request).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidOrder);
    assert!(is_empty_dir(root.path()));
}

#[tokio::test]
async fn test_all_sources_empty() {
    let (runner, root) = isolated_runner();
    let request = MergeRequest::new(vec![upload("x", 0), upload("y", 0)]);

    let err = runner.run_job(request).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::EmptyResult);
    assert!(is_empty_dir(root.path()));
}

#[tokio::test]
async fn test_empty_sources_are_skipped() {
    let (runner, _root) = isolated_runner();
    let request = MergeRequest::new(vec![upload("a", 2), upload("empty", 0), upload("b", 1)]);

    let output = runner.run_job(request).await.unwrap();

    assert_eq!(output.statistics.files_merged, 2);
    assert_eq!(output.statistics.files_skipped, 1);
    assert_eq!(
        page_markers(&output.bytes),
        [markers("a", 2), markers("b", 1)].concat()
    );
}

#[tokio::test]
async fn test_missing_input_file() {
    let reader = PdfReader::new();
    let paths = vec![PathBuf::from("/definitely/not/here.pdf")];

    let err = reader.read_all(&paths, 1).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FileNotFound);
    assert_ne!(err.exit_code(), 0);
}
