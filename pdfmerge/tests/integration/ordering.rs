//! Integration tests for merge ordering.

use pdfmerge::codec::LopdfCodec;
use pdfmerge::merge::Merger;
use pdfmerge::{DocumentHandle, MergeRequest, SourceList};
use rstest::rstest;

use crate::common::{isolated_runner, markers, page_markers, pdf_bytes, upload};

#[rstest]
#[case(vec![0, 1, 2], vec!["a", "b", "c"])]
#[case(vec![2, 0, 1], vec!["c", "a", "b"])]
#[case(vec![2, 1, 0], vec!["c", "b", "a"])]
#[case(vec![1, 2, 0], vec!["b", "c", "a"])]
#[tokio::test]
async fn test_explicit_order(#[case] order: Vec<usize>, #[case] expected: Vec<&str>) {
    let (runner, _root) = isolated_runner();
    let request =
        MergeRequest::new(vec![upload("a", 1), upload("b", 2), upload("c", 1)]).with_order(order);

    let output = runner.run_job(request).await.unwrap();

    let pages = |label: &str| if label == "b" { 2 } else { 1 };
    let expected: Vec<String> = expected
        .into_iter()
        .flat_map(|label| markers(label, pages(label)))
        .collect();
    assert_eq!(page_markers(&output.bytes), expected);
}

#[test]
fn test_source_list_edits_drive_merge_order() {
    let codec = LopdfCodec::new();
    let mut sources = SourceList::new();

    let a = sources.append(DocumentHandle::decode(&codec, &pdf_bytes("a", 1), "a.pdf").unwrap());
    let b = sources.append(DocumentHandle::decode(&codec, &pdf_bytes("b", 1), "b.pdf").unwrap());
    sources.append(DocumentHandle::decode(&codec, &pdf_bytes("c", 1), "c.pdf").unwrap());

    sources.move_to(b, 0).unwrap();
    assert!(sources.remove(a).is_some());
    assert!(sources.remove(a).is_none());

    let result = Merger::new(codec).merge(&sources).unwrap();
    assert_eq!(page_markers(&result.bytes), vec!["b-p1", "c-p1"]);
}
