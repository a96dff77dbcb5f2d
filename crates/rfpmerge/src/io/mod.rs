//! I/O operations for rfpmerge.
//!
//! - [`PdfReader`] loads documents from disk, from uploaded bytes, or from
//!   documents generated in-process.
//! - [`PdfWriter`] serializes the merged document, creating the output
//!   directory on demand, and reads it back for download.

pub mod reader;
pub mod writer;

pub use reader::{DocumentSource, LoadedPdf, PdfReader, SourceData};
pub use writer::{PdfWriter, WriteOptions, WriteStatistics};
