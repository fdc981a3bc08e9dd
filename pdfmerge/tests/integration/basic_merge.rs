//! Integration tests for end-to-end merges.

use lopdf::Document;
use pdfmerge::MergeRequest;
use pdfmerge::io::{PdfReader, PdfWriter};
use pdfmerge::job::PDF_MIME_TYPE;
use tempfile::TempDir;

use crate::common::{isolated_runner, markers, page_markers, pdf_bytes, upload};

#[tokio::test]
async fn test_merge_two_pdfs() {
    let (runner, _root) = isolated_runner();
    let request = MergeRequest::new(vec![upload("a", 2), upload("b", 3)]);

    let output = runner.run_job(request).await.unwrap();

    assert_eq!(output.statistics.files_merged, 2);
    assert_eq!(output.statistics.total_pages, 5);
    assert_eq!(output.statistics.output_size, output.bytes.len() as u64);
    assert_eq!(
        page_markers(&output.bytes),
        [markers("a", 2), markers("b", 3)].concat()
    );
}

#[tokio::test]
async fn test_output_is_a_fresh_document() {
    let (runner, _root) = isolated_runner();
    let request = MergeRequest::new(vec![upload("a", 1), upload("b", 1)]);

    let output = runner.run_job(request).await.unwrap();
    let doc = Document::load_mem(&output.bytes).unwrap();

    assert_eq!(doc.get_pages().len(), 2);
    assert!(doc.catalog().is_ok());
}

#[tokio::test]
async fn test_merge_many_pdfs() {
    let (runner, _root) = isolated_runner();
    let files = (0..6).map(|i| upload(&format!("doc{i}"), i + 1)).collect();

    let output = runner.run_job(MergeRequest::new(files)).await.unwrap();

    assert_eq!(output.statistics.files_merged, 6);
    assert_eq!(output.statistics.total_pages, 21);
    let expected: Vec<String> = (0..6)
        .flat_map(|i| markers(&format!("doc{i}"), i + 1))
        .collect();
    assert_eq!(page_markers(&output.bytes), expected);
}

#[tokio::test]
async fn test_same_file_twice() {
    let (runner, _root) = isolated_runner();
    let request = MergeRequest::new(vec![upload("a", 2), upload("a", 2)]);

    let output = runner.run_job(request).await.unwrap();

    assert_eq!(
        page_markers(&output.bytes),
        [markers("a", 2), markers("a", 2)].concat()
    );
}

#[tokio::test]
async fn test_output_metadata() {
    let (runner, _root) = isolated_runner();
    let request =
        MergeRequest::new(vec![upload("a", 1), upload("b", 1)]).with_output_name("Quarterly");

    let output = runner.run_job(request).await.unwrap();

    assert_eq!(output.suggested_file_name, "Quarterly.pdf");
    assert_eq!(output.content_type(), PDF_MIME_TYPE);
    assert_eq!(
        output.content_disposition(),
        "attachment; filename=\"Quarterly.pdf\""
    );
}

#[tokio::test]
async fn test_default_output_name() {
    let (runner, _root) = isolated_runner();
    let request = MergeRequest::new(vec![upload("a", 1), upload("b", 1)]);

    let output = runner.run_job(request).await.unwrap();

    let name = &output.suggested_file_name;
    assert!(name.starts_with("merged_"), "unexpected name {name}");
    assert!(name.ends_with(".pdf"));
}

#[tokio::test]
async fn test_read_merge_write_roundtrip_on_disk() {
    let dir = TempDir::new().unwrap();
    let paths: Vec<_> = ["first", "second", "third", "fourth"]
        .iter()
        .map(|label| {
            let path = dir.path().join(format!("{label}.pdf"));
            std::fs::write(&path, pdf_bytes(label, 1)).unwrap();
            path
        })
        .collect();

    let (files, stats) = PdfReader::new().read_all(&paths, 2).await.unwrap();
    assert_eq!(stats.files_read, 4);

    let (runner, _root) = isolated_runner();
    let output = runner.run_job(MergeRequest::new(files)).await.unwrap();

    let output_path = dir.path().join(&output.suggested_file_name);
    let write_stats = PdfWriter::new()
        .save_with_stats(&output.bytes, &output_path)
        .await
        .unwrap();

    assert_eq!(write_stats.file_size, output.bytes.len() as u64);
    let written = std::fs::read(&output_path).unwrap();
    assert_eq!(
        page_markers(&written),
        vec!["first-p1", "second-p1", "third-p1", "fourth-p1"]
    );
}

#[tokio::test]
async fn test_pages_land_in_source_blocks() {
    let (runner, _root) = isolated_runner();
    let request = MergeRequest::new(vec![upload("doc1", 2), upload("doc2", 1), upload("doc3", 3)]);

    let output = runner.run_job(request).await.unwrap();

    assert_eq!(
        page_markers(&output.bytes),
        vec!["doc1-p1", "doc1-p2", "doc2-p1", "doc3-p1", "doc3-p2", "doc3-p3"]
    );
}
