//! Integration tests for merge planning without output.

use pdfmerge::{ErrorKind, MergeRequest};

use crate::common::{is_empty_dir, isolated_runner, upload};

#[tokio::test]
async fn test_plan_describes_merge() {
    let (runner, root) = isolated_runner();
    let request = MergeRequest::new(vec![upload("a", 2), upload("b", 3)])
        .with_order(vec![1, 0])
        .with_output_name("out");

    let plan = runner.plan(request).await.unwrap();

    let names: Vec<_> = plan.sources.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["b.pdf", "a.pdf"]);
    assert_eq!(plan.total_pages, 5);
    assert_eq!(plan.files_merged(), 2);
    assert_eq!(plan.files_skipped(), 0);
    assert_eq!(plan.output_name, "out.pdf");
    assert!(is_empty_dir(root.path()));
}

#[tokio::test]
async fn test_plan_reports_skipped_sources() {
    let (runner, _root) = isolated_runner();
    let request = MergeRequest::new(vec![upload("empty", 0), upload("a", 1)]);

    let plan = runner.plan(request).await.unwrap();

    assert!(plan.sources[0].is_skipped());
    assert!(!plan.sources[1].is_skipped());
    assert_eq!(plan.files_merged(), 1);
    assert_eq!(plan.files_skipped(), 1);
}

#[tokio::test]
async fn test_plan_all_empty() {
    let (runner, root) = isolated_runner();
    let request = MergeRequest::new(vec![upload("x", 0), upload("y", 0)]);

    let err = runner.plan(request).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::EmptyResult);
    assert!(is_empty_dir(root.path()));
}

#[tokio::test]
async fn test_plan_rejects_bad_input_like_a_run() {
    let (runner, _root) = isolated_runner();
    let request = MergeRequest::new(vec![upload("a", 1)]);

    let err = runner.plan(request).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InsufficientSources);
}
