//! RFPs extracted from a ZIP archive.

use rfpmerge::{MergeError, MergeSession};
use tempfile::TempDir;

use crate::common::{DIVIDER_WIDTH, page_widths, pdf_bytes, test_config, widths_of, zip_bytes};

#[tokio::test]
async fn test_archive_with_two_pdfs() {
    let temp_dir = TempDir::new().unwrap();
    let mut session = MergeSession::start(&test_config(&temp_dir)).await.unwrap();

    let archive = zip_bytes(&[("a.pdf", pdf_bytes(1, 2)), ("b.pdf", pdf_bytes(2, 3))]);
    let members = session.stage_archive("rfps.zip", archive).await.unwrap();
    assert_eq!(members, vec!["a.pdf", "b.pdf"]);

    session.select_archive_members(&members).unwrap();
    session.stage_response("response.pdf", pdf_bytes(3, 1)).await.unwrap();
    session.set_output_name("from-archive");

    let output = session.merge().await.unwrap();

    let mut expected = widths_of(1, 2);
    expected.extend(widths_of(2, 3));
    expected.push(DIVIDER_WIDTH);
    expected.extend(widths_of(3, 1));
    assert_eq!(page_widths(&output.path), expected);
    assert_eq!(output.file_name(), "from-archive.pdf");
}

#[tokio::test]
async fn test_archive_selection_order() {
    let temp_dir = TempDir::new().unwrap();
    let mut session = MergeSession::start(&test_config(&temp_dir)).await.unwrap();

    let archive = zip_bytes(&[
        ("a.pdf", pdf_bytes(1, 1)),
        ("b.pdf", pdf_bytes(2, 1)),
        ("c.pdf", pdf_bytes(3, 1)),
    ]);
    session.stage_archive("rfps.zip", archive).await.unwrap();

    session.select_archive_members(&["c.pdf", "a.pdf"]).unwrap();
    session.stage_response("response.pdf", pdf_bytes(4, 1)).await.unwrap();

    let output = session.merge().await.unwrap();

    let mut expected = widths_of(3, 1);
    expected.extend(widths_of(1, 1));
    expected.push(DIVIDER_WIDTH);
    expected.extend(widths_of(4, 1));
    assert_eq!(page_widths(&output.path), expected);
}

#[tokio::test]
async fn test_archive_rejects_unknown_member() {
    let temp_dir = TempDir::new().unwrap();
    let mut session = MergeSession::start(&test_config(&temp_dir)).await.unwrap();

    let archive = zip_bytes(&[("a.pdf", pdf_bytes(1, 1))]);
    session.stage_archive("rfps.zip", archive).await.unwrap();

    let err = session.select_archive_members(&["z.pdf"]).unwrap_err();
    assert!(matches!(err, MergeError::MemberNotFound { ref name } if name == "z.pdf"));
}

#[tokio::test]
async fn test_archive_with_corrupt_member_in_batch() {
    let temp_dir = TempDir::new().unwrap();
    let mut session = MergeSession::start(&test_config(&temp_dir)).await.unwrap();

    let archive = zip_bytes(&[
        ("good.pdf", pdf_bytes(1, 1)),
        ("bad.pdf", b"corrupt".to_vec()),
        ("notes.txt", b"not merged".to_vec()),
    ]);
    session.stage_archive("rfps.zip", archive).await.unwrap();
    assert_eq!(session.select_archive_pdfs().unwrap(), 2);
    session.stage_response("response.pdf", pdf_bytes(2, 1)).await.unwrap();

    let output = session.merge().await.unwrap();
    assert_eq!(output.report.skipped[0].label, "bad.pdf");
    assert_eq!(output.page_count, 3);
}
