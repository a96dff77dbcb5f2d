//! Error handling and edge cases.

use rfpmerge::io::DocumentSource;
use rfpmerge::merge::concatenate;
use rfpmerge::{ErrorPolicy, MergeError, MergeSession};
use tempfile::TempDir;

use crate::common::{test_config, write_pdf};

#[tokio::test]
async fn test_error_nonexistent_input() {
    let temp_dir = TempDir::new().unwrap();
    let result = concatenate(
        vec![DocumentSource::from_path("/nonexistent/file.pdf")],
        &temp_dir.path().join("out.pdf"),
        ErrorPolicy::Abort,
    )
    .await;

    assert!(matches!(result, Err(MergeError::FileNotFound { .. })));
}

#[tokio::test]
async fn test_error_empty_input_list() {
    let temp_dir = TempDir::new().unwrap();
    let result = concatenate(vec![], &temp_dir.path().join("out.pdf"), ErrorPolicy::SkipFailed).await;

    assert!(matches!(result, Err(MergeError::NoFilesToMerge)));
}

#[tokio::test]
async fn test_error_all_inputs_unreadable() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("out.pdf");
    let result = concatenate(
        vec![
            DocumentSource::from_bytes("a.pdf", b"junk".to_vec()),
            DocumentSource::from_bytes("b.pdf", Vec::new()),
        ],
        &output_path,
        ErrorPolicy::SkipFailed,
    )
    .await;

    assert!(matches!(result, Err(MergeError::NoFilesToMerge)));
    assert!(!output_path.exists());
}

#[tokio::test]
async fn test_error_invalid_archive() {
    let temp_dir = TempDir::new().unwrap();
    let mut session = MergeSession::start(&test_config(&temp_dir)).await.unwrap();

    let result = session.stage_archive("rfps.zip", b"PK but not really".to_vec()).await;
    assert!(matches!(result, Err(MergeError::Archive { .. })));
}

#[tokio::test]
async fn test_error_invalid_output_name() {
    let temp_dir = TempDir::new().unwrap();
    let mut session = MergeSession::start(&test_config(&temp_dir)).await.unwrap();

    session.stage_rfp_path(write_pdf(temp_dir.path(), "a.pdf", 1, 1)).await.unwrap();
    session.stage_rfp_path(write_pdf(temp_dir.path(), "b.pdf", 2, 1)).await.unwrap();
    session.stage_response_path(write_pdf(temp_dir.path(), "r.pdf", 3, 1)).await.unwrap();
    session.set_output_name("..");

    assert!(matches!(
        session.merge().await,
        Err(MergeError::InvalidConfig { .. })
    ));
}

#[tokio::test]
async fn test_session_rejects_invalid_config() {
    let temp_dir = TempDir::new().unwrap();
    let mut config = test_config(&temp_dir);
    config.scratch_dir = config.output_dir.clone();

    assert!(matches!(
        MergeSession::start(&config).await,
        Err(MergeError::InvalidConfig { .. })
    ));
}
