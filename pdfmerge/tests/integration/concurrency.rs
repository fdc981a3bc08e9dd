//! Integration tests for concurrent jobs on one runner.

use futures::future::join_all;
use pdfmerge::MergeRequest;
use std::collections::HashSet;

use crate::common::{is_empty_dir, isolated_runner, markers, page_markers, upload};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_jobs_are_isolated() {
    let (runner, root) = isolated_runner();

    let jobs = (0..8).map(|i| {
        let runner = runner.clone();
        async move {
            let first = format!("job{i}a");
            let second = format!("job{i}b");
            let request = MergeRequest::new(vec![upload(&first, 1), upload(&second, 2)]);
            let output = runner.run_job(request).await.unwrap();
            (i, output)
        }
    });

    let outputs = join_all(jobs).await;

    let mut job_ids = HashSet::new();
    for (i, output) in outputs {
        assert!(job_ids.insert(output.job_id));
        assert_eq!(
            page_markers(&output.bytes),
            [markers(&format!("job{i}a"), 1), markers(&format!("job{i}b"), 2)].concat()
        );
    }

    assert_eq!(job_ids.len(), 8);
    assert!(is_empty_dir(root.path()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failure_does_not_affect_other_jobs() {
    let (runner, root) = isolated_runner();

    let good = runner.run_job(MergeRequest::new(vec![upload("a", 1), upload("b", 1)]));
    let bad = runner.run_job(MergeRequest::new(vec![upload("c", 1)]));

    let (good, bad) = futures::join!(good, bad);

    assert_eq!(page_markers(&good.unwrap().bytes), vec!["a-p1", "b-p1"]);
    assert!(bad.is_err());
    assert!(is_empty_dir(root.path()));
}
