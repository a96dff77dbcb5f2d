//! PDF writing and saving operations.
//!
//! The writer serializes a finished document in one pass. A missing output
//! directory is created first; it is never an error. Writes are atomic by
//! default: the document goes to a sibling temp file that is then renamed
//! into place, so a reader never sees a half-written PDF.

use lopdf::Document;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;

use crate::error::{MergeError, Result};

/// Options for writing PDF files.
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Use atomic writes (write to temp file, then rename).
    pub atomic: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { atomic: true }
    }
}

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,

    /// Whether the output directory had to be created.
    pub created_dir: bool,
}

/// PDF writer with configurable behavior.
#[derive(Debug, Clone, Default)]
pub struct PdfWriter {
    options: WriteOptions,
}

impl PdfWriter {
    /// Create a new PDF writer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer without atomic writes.
    pub fn non_atomic() -> Self {
        Self {
            options: WriteOptions { atomic: false },
        }
    }

    /// Save a PDF and return statistics about the operation.
    ///
    /// The parent directory is created if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The output directory cannot be created
    /// - The output file cannot be created
    /// - Serialization or the final rename fails; a leftover temp file is
    ///   removed
    pub async fn save_with_stats(&self, mut doc: Document, path: &Path) -> Result<WriteStatistics> {
        let path_buf = path.to_path_buf();
        let options = self.options.clone();

        let created_dir = ensure_parent_dir(&path_buf).await?;

        let stats = task::spawn_blocking(move || {
            let start = Instant::now();

            let write_path = if options.atomic {
                path_buf.with_extension("pdf.tmp")
            } else {
                path_buf.clone()
            };

            let written = write_document(&mut doc, &write_path, &path_buf, options.atomic);
            if written.is_err() && options.atomic {
                let _ = std::fs::remove_file(&write_path);
            }
            written?;

            let file_size = std::fs::metadata(&path_buf).map(|m| m.len()).unwrap_or(0);

            Ok::<_, MergeError>(WriteStatistics {
                write_time: start.elapsed(),
                file_size,
                output_path: path_buf,
                created_dir,
            })
        })
        .await
        .map_err(|e| MergeError::other(format!("Write task failed: {e}")))??;

        tracing::info!(
            path = %stats.output_path.display(),
            size = stats.file_size,
            "Wrote merged PDF"
        );

        Ok(stats)
    }

    /// Reopen a written file read-only and return its bytes.
    pub async fn read_back(&self, path: &Path) -> Result<Vec<u8>> {
        tokio::fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => MergeError::file_not_found(path.to_path_buf()),
            _ => MergeError::from(e),
        })
    }
}

fn write_document(doc: &mut Document, write_path: &Path, path: &Path, atomic: bool) -> Result<()> {
    let file = std::fs::File::create(write_path).map_err(|e| MergeError::FailedToCreateOutput {
        path: write_path.to_path_buf(),
        source: e,
    })?;

    let mut writer = std::io::BufWriter::new(file);

    doc.save_to(&mut writer)
        .map_err(|e| MergeError::FailedToWrite {
            path: write_path.to_path_buf(),
            source: std::io::Error::other(e),
        })?;

    writer.flush().map_err(|e| MergeError::FailedToWrite {
        path: write_path.to_path_buf(),
        source: e,
    })?;
    drop(writer);

    if atomic {
        std::fs::rename(write_path, path).map_err(|e| MergeError::FailedToWrite {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

/// Create the parent directory of `path` if it is missing.
///
/// Returns whether a directory was created.
async fn ensure_parent_dir(path: &Path) -> Result<bool> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(false);
    };

    if tokio::fs::metadata(parent).await.is_ok() {
        return Ok(false);
    }

    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| MergeError::FailedToCreateOutput {
            path: parent.to_path_buf(),
            source: e,
        })?;

    tracing::debug!(dir = %parent.display(), "Created output directory");
    Ok(true)
}
