//! Per-document outcome of a merge.

use serde::Serialize;
use std::path::PathBuf;

use crate::merge::DocumentRole;
use crate::utils::format_file_size;

/// A document whose pages made it into the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedDocument {
    /// Source label.
    pub label: String,
    /// Role of the document, when it came from a [`MergeJob`](crate::merge::MergeJob).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<DocumentRole>,
    /// Index of the document's first page in the output (0-based).
    pub first_page: usize,
    /// Number of pages contributed.
    pub page_count: usize,
}

/// A document that was skipped because it could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDocument {
    /// Source label.
    pub label: String,
    /// Why the document was skipped.
    pub reason: String,
}

/// What happened to each source document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Documents merged, in output order.
    pub merged: Vec<MergedDocument>,
    /// Documents skipped, in input order.
    pub skipped: Vec<SkippedDocument>,
}

impl MergeReport {
    /// Total pages across merged documents.
    pub fn total_pages(&self) -> usize {
        self.merged.iter().map(|doc| doc.page_count).sum()
    }

    /// Whether any document was skipped.
    pub fn has_failures(&self) -> bool {
        !self.skipped.is_empty()
    }

    /// Output page index of the first page with the given role.
    pub fn first_page_of(&self, role: DocumentRole) -> Option<usize> {
        self.merged
            .iter()
            .find(|doc| doc.role == Some(role))
            .map(|doc| doc.first_page)
    }
}

/// The written result of a merge.
#[derive(Debug, Clone, Serialize)]
pub struct OutputDocument {
    /// Where the merged PDF was written.
    pub path: PathBuf,
    /// Pages in the merged PDF.
    pub page_count: usize,
    /// Size of the written file in bytes.
    pub file_size: u64,
    /// Per-document outcome.
    pub report: MergeReport,
}

impl OutputDocument {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }

    /// File name of the output, used as the download name.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}
