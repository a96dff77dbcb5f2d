//! PDF reading and loading operations.
//!
//! Sources are either files on disk, in-memory uploads, or documents that were
//! generated in-process (the divider page). Parsing runs on the blocking pool
//! so the async caller is never stalled by lopdf.
//!
//! # Examples
//!
//! ```no_run
//! use rfpmerge::io::{DocumentSource, PdfReader};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let loaded = reader.load(DocumentSource::from_path("rfp.pdf")).await?;
//! println!("{} has {} pages", loaded.label, loaded.page_count);
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::task;

use crate::error::{MergeError, Result};

/// Where a document's bytes come from.
#[derive(Debug, Clone)]
pub enum SourceData {
    /// A PDF file on disk.
    Path(PathBuf),
    /// An in-memory PDF byte stream.
    Bytes(Vec<u8>),
    /// A document built in-process.
    Generated(Document),
}

/// A document to be read, with a human-readable label for reporting.
#[derive(Debug, Clone)]
pub struct DocumentSource {
    /// Name used in reports and error messages.
    pub label: String,
    /// The document contents.
    pub data: SourceData,
}

impl DocumentSource {
    /// Source backed by a file; labelled with its file name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let label = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            label,
            data: SourceData::Path(path),
        }
    }

    /// Source backed by a file with an explicit label.
    pub fn labelled_path(label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            label: label.into(),
            data: SourceData::Path(path.into()),
        }
    }

    /// Source backed by an in-memory byte stream.
    pub fn from_bytes(label: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            label: label.into(),
            data: SourceData::Bytes(bytes),
        }
    }

    /// Source backed by an already-built document.
    pub fn generated(label: impl Into<String>, document: Document) -> Self {
        Self {
            label: label.into(),
            data: SourceData::Generated(document),
        }
    }
}

/// A loaded PDF document with metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Label of the source.
    pub label: String,

    /// Number of pages in the document.
    pub page_count: usize,

    /// Time taken to load the document.
    pub load_time: Duration,

    /// Size of the source in bytes (0 for generated documents).
    pub byte_size: u64,
}

/// PDF reader.
///
/// Rejects encrypted documents and documents without pages.
#[derive(Debug, Clone, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new PDF reader.
    pub fn new() -> Self {
        Self
    }

    /// Load a single PDF document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The source file does not exist
    /// - The bytes are not a valid PDF
    /// - The PDF is encrypted
    /// - The PDF has no pages
    pub async fn load(&self, source: DocumentSource) -> Result<LoadedPdf> {
        let DocumentSource { label, data } = source;
        let start = Instant::now();

        let (document, byte_size) = match data {
            SourceData::Generated(document) => (document, 0),
            SourceData::Path(path) => {
                let byte_size = tokio::fs::metadata(&path)
                    .await
                    .map_err(|_| MergeError::file_not_found(path.clone()))?
                    .len();
                let doc_label = label.clone();
                let document = task::spawn_blocking(move || Document::load(path))
                    .await
                    .map_err(|e| MergeError::other(format!("Load task failed: {e}")))?
                    .map_err(|e| classify_load_error(&doc_label, e))?;
                (document, byte_size)
            }
            SourceData::Bytes(bytes) => {
                let byte_size = bytes.len() as u64;
                let doc_label = label.clone();
                let document = task::spawn_blocking(move || Document::load_mem(&bytes))
                    .await
                    .map_err(|e| MergeError::other(format!("Load task failed: {e}")))?
                    .map_err(|e| classify_load_error(&doc_label, e))?;
                (document, byte_size)
            }
        };

        if document.is_encrypted() {
            return Err(MergeError::encrypted_pdf(label));
        }

        let page_count = document.get_pages().len();
        if page_count == 0 {
            return Err(MergeError::corrupted_pdf(label, "PDF has no pages"));
        }

        let load_time = start.elapsed();
        tracing::debug!(label = %label, page_count, byte_size, ?load_time, "Loaded document");

        Ok(LoadedPdf {
            document,
            label,
            page_count,
            load_time,
            byte_size,
        })
    }
}

fn classify_load_error(label: &str, err: lopdf::Error) -> MergeError {
    let err_msg = err.to_string();
    let lowered = err_msg.to_lowercase();
    if lowered.contains("encrypt") || lowered.contains("password") {
        MergeError::encrypted_pdf(label)
    } else {
        MergeError::failed_to_load_pdf(label, err_msg)
    }
}
