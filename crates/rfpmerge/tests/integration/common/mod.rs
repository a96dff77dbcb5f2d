//! Shared helpers for integration tests.
//!
//! The document and archive builders are the crate's own unit-test
//! fixtures. Every page's MediaBox width encodes which document and which
//! page it came from, so a merged file can be checked page by page.

#![allow(dead_code)]

use lopdf::Document;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use rfpmerge::Config;

#[path = "../../../src/testing.rs"]
mod fixtures;

pub use fixtures::{marker_width as page_width, zip_bytes};

/// Width of the generated divider page.
pub const DIVIDER_WIDTH: i64 = 612;

/// Expected widths for a document of `pages` pages.
pub fn widths_of(marker: i64, pages: usize) -> Vec<i64> {
    (0..pages).map(|index| page_width(marker, index)).collect()
}

/// Serialize a document with `pages` pages tagged with `marker`.
pub fn pdf_bytes(marker: i64, pages: usize) -> Vec<u8> {
    fixtures::marked_pdf_bytes(marker, pages)
}

/// Write a generated PDF into `dir`.
pub fn write_pdf(dir: &Path, name: &str, marker: i64, pages: usize) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, pdf_bytes(marker, pages)).unwrap();
    path
}

/// MediaBox widths of every page in the PDF at `path`.
pub fn page_widths(path: &Path) -> Vec<i64> {
    fixtures::page_widths(&Document::load(path).unwrap())
}

/// Config with output and scratch directories inside `temp_dir`.
pub fn test_config(temp_dir: &TempDir) -> Config {
    Config {
        output_dir: temp_dir.path().join("merged_folder"),
        scratch_dir: temp_dir.path().join("scratch"),
        quiet: true,
        ..Config::default()
    }
}
