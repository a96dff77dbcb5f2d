//! rfpmerge - combine RFP documents and their response into a single PDF.
//!
//! A merged document contains every RFP document in order, a generated
//! "RFP RESPONSE" divider page, and then the response document. The RFPs can
//! be uploaded individually or extracted from a ZIP archive.
//!
//! - A single RFP is merged in *single-document mode*: any unreadable input
//!   aborts the merge.
//! - Several RFPs are merged in *batch mode*: unreadable inputs are reported
//!   and skipped.
//!
//! # Examples
//!
//! ## Session workflow
//!
//! ```no_run
//! use rfpmerge::{Config, MergeSession};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = MergeSession::start(&Config::default()).await?;
//! session.stage_rfp_path("tender.pdf").await?;
//! session.stage_response_path("answer.pdf").await?;
//!
//! let output = session.merge().await?;
//! println!("Created {} with {} pages", output.path.display(), output.page_count);
//! # Ok(())
//! # }
//! ```
//!
//! ## Using individual components
//!
//! ```no_run
//! use rfpmerge::config::ErrorPolicy;
//! use rfpmerge::divider::DividerPage;
//! use rfpmerge::io::DocumentSource;
//! use rfpmerge::merge::Concatenator;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let output = Concatenator::new(ErrorPolicy::Abort)
//!     .concatenate(
//!         vec![
//!             DocumentSource::from_path("tender.pdf"),
//!             DividerPage::source(),
//!             DocumentSource::from_path("answer.pdf"),
//!         ],
//!         Path::new("merged_folder/tender_merged.pdf"),
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod archive;
pub mod config;
pub mod divider;
pub mod error;
pub mod io;
pub mod merge;
pub mod naming;
pub mod output;
pub mod session;
pub mod utils;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::{Config, ErrorPolicy};
pub use error::{MergeError, Result};
pub use merge::{Concatenator, MergeReport, OutputDocument};
pub use session::{MergeMode, MergeSession};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
