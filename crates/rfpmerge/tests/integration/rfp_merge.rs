//! Single-document mode: one RFP, the divider, one response.

use rfpmerge::divider::DividerPage;
use rfpmerge::io::DocumentSource;
use rfpmerge::merge::{Concatenator, DocumentRole, MergeJob};
use rfpmerge::{ErrorPolicy, MergeError, MergeMode, MergeSession};
use tempfile::TempDir;

use crate::common::{DIVIDER_WIDTH, page_widths, pdf_bytes, test_config, widths_of, write_pdf};

#[tokio::test]
async fn test_three_page_rfp_and_two_page_response() {
    let temp_dir = TempDir::new().unwrap();
    let mut session = MergeSession::start(&test_config(&temp_dir)).await.unwrap();

    session.stage_rfp("rfp.pdf", pdf_bytes(1, 3)).await.unwrap();
    session.stage_response("response.pdf", pdf_bytes(2, 2)).await.unwrap();
    assert_eq!(session.mode(), MergeMode::Single);

    let output = session.merge().await.unwrap();

    assert_eq!(output.page_count, 6);
    assert_eq!(output.file_name(), "rfp_merged.pdf");
    assert_eq!(output.path, temp_dir.path().join("merged_folder/rfp_merged.pdf"));

    let mut expected = widths_of(1, 3);
    expected.push(DIVIDER_WIDTH);
    expected.extend(widths_of(2, 2));
    assert_eq!(page_widths(&output.path), expected);

    // page 4, 1-indexed
    assert_eq!(output.report.first_page_of(DocumentRole::Divider), Some(3));
}

#[tokio::test]
async fn test_output_directory_is_created() {
    let temp_dir = TempDir::new().unwrap();
    let rfp = write_pdf(temp_dir.path(), "rfp.pdf", 1, 1);
    let response = write_pdf(temp_dir.path(), "response.pdf", 2, 1);
    let output_path = temp_dir.path().join("does/not/exist/yet.pdf");

    let job = MergeJob::new(&output_path)
        .rfp(DocumentSource::from_path(rfp))
        .with_divider(true)
        .response(DocumentSource::from_path(response));
    let output = Concatenator::new(ErrorPolicy::Abort).run(job).await.unwrap();

    assert!(output_path.exists());
    assert_eq!(output.page_count, 3);
}

#[tokio::test]
async fn test_divider_alone_is_one_page() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("divider.pdf");

    let output = Concatenator::new(ErrorPolicy::Abort)
        .concatenate(vec![DividerPage::source()], &output_path)
        .await
        .unwrap();

    assert_eq!(output.page_count, 1);
    assert_eq!(page_widths(&output_path), vec![DIVIDER_WIDTH]);
}

#[tokio::test]
async fn test_unreadable_rfp_aborts_without_output() {
    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir);
    let mut session = MergeSession::start(&config).await.unwrap();

    session.stage_rfp("rfp.pdf", b"%PDF-1.5 truncated".to_vec()).await.unwrap();
    session.stage_response("response.pdf", pdf_bytes(2, 2)).await.unwrap();

    let err = session.merge().await.unwrap_err();
    assert!(err.is_recoverable());
    assert!(!config.output_dir.join("rfp_merged.pdf").exists());
}

#[tokio::test]
async fn test_merge_before_upload_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let mut session = MergeSession::start(&test_config(&temp_dir)).await.unwrap();

    session.stage_rfp("rfp.pdf", pdf_bytes(1, 1)).await.unwrap();
    assert!(!session.is_ready());
    assert!(matches!(
        session.merge().await,
        Err(MergeError::MissingInput { .. })
    ));
}

#[tokio::test]
async fn test_download_matches_written_file() {
    let temp_dir = TempDir::new().unwrap();
    let mut session = MergeSession::start(&test_config(&temp_dir)).await.unwrap();

    session.stage_rfp_path(write_pdf(temp_dir.path(), "City Tender.pdf", 1, 2)).await.unwrap();
    session.stage_response_path(write_pdf(temp_dir.path(), "answer.pdf", 2, 1)).await.unwrap();

    let output = session.merge().await.unwrap();
    let bytes = session.read_output(&output).await.unwrap();

    assert_eq!(output.file_name(), "City Tender_merged.pdf");
    assert_eq!(bytes, std::fs::read(&output.path).unwrap());
}
