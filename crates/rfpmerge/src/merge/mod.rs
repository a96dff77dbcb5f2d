//! PDF concatenation.
//!
//! - [`MergeJob`] fixes the document order: RFPs, divider, response.
//! - [`Concatenator`] reads each document once, appends its pages in file
//!   order and writes the output in a single pass. Its [`ErrorPolicy`]
//!   decides whether an unreadable document aborts the job or is reported
//!   and skipped.
//!
//! # Examples
//!
//! ```no_run
//! use rfpmerge::config::ErrorPolicy;
//! use rfpmerge::io::DocumentSource;
//! use rfpmerge::merge::{Concatenator, MergeJob};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let job = MergeJob::new("merged_folder/tender_merged.pdf")
//!     .rfp(DocumentSource::from_path("tender.pdf"))
//!     .with_divider(true)
//!     .response(DocumentSource::from_path("answer.pdf"));
//!
//! let output = Concatenator::new(ErrorPolicy::Abort).run(job).await?;
//! println!("Wrote {} pages to {}", output.page_count, output.path.display());
//! # Ok(())
//! # }
//! ```
//!
//! [`ErrorPolicy`]: crate::config::ErrorPolicy

pub mod job;
pub mod merger;
pub mod report;

pub use job::{DocumentRole, MergeJob};
pub use merger::Concatenator;
pub use report::{MergeReport, MergedDocument, OutputDocument, SkippedDocument};

use crate::config::ErrorPolicy;
use crate::error::Result;
use crate::io::DocumentSource;
use std::path::Path;

/// Concatenate `documents` into `output_path` with the given error policy.
///
/// Convenience wrapper around [`Concatenator::concatenate`].
pub async fn concatenate(
    documents: Vec<DocumentSource>,
    output_path: &Path,
    policy: ErrorPolicy,
) -> Result<OutputDocument> {
    Concatenator::new(policy)
        .concatenate(documents, output_path)
        .await
}
