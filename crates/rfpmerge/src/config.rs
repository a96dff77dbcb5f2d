//! Configuration for rfpmerge.
//!
//! The CLI turns its arguments (and environment variables) into a [`Config`]
//! that drives sessions and the concatenator. The configuration is validated
//! once, up front, so the merge path never has to second-guess it.

use serde::Serialize;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{MergeError, Result};

/// Default directory merged documents are written to.
pub const DEFAULT_OUTPUT_DIR: &str = "merged_folder";

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// No compression - preserves exact quality and structure.
    None,
    /// Balanced compression.
    #[default]
    Standard,
    /// Maximum compression - also renumbers objects densely.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = MergeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(MergeError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// What the concatenator does when a source document cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Fail the whole job on the first unreadable document.
    Abort,
    /// Report the unreadable document and continue with the rest.
    SkipFailed,
}

impl ErrorPolicy {
    /// Whether a failed document should be skipped rather than abort the job.
    pub fn skips_failures(&self) -> bool {
        matches!(self, Self::SkipFailed)
    }
}

/// Complete configuration for merge sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    /// Directory merged documents are written to (created on demand).
    pub output_dir: PathBuf,

    /// Root directory for per-session scratch storage.
    pub scratch_dir: PathBuf,

    /// Explicit error policy. `None` picks the mode default: abort for a
    /// single RFP, skip-failed for a batch.
    pub error_policy: Option<ErrorPolicy>,

    /// Insert the "RFP RESPONSE" divider page before the response.
    pub divider: bool,

    /// Compression level for output.
    pub compression: CompressionLevel,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            scratch_dir: default_scratch_dir(),
            error_policy: None,
            divider: true,
            compression: CompressionLevel::Standard,
            verbose: false,
            quiet: false,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Verbose and quiet are both set
    /// - The output directory is empty
    /// - Scratch and output directories are the same
    pub fn validate(&self) -> Result<()> {
        if self.verbose && self.quiet {
            return Err(MergeError::invalid_config(
                "Cannot use both --verbose and --quiet",
            ));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(MergeError::invalid_config(
                "Output directory must not be empty",
            ));
        }

        if self.scratch_dir == self.output_dir {
            return Err(MergeError::invalid_config(format!(
                "Scratch directory cannot be the output directory: {}",
                self.output_dir.display()
            )));
        }

        Ok(())
    }
}

/// Default scratch root: `<system temp>/rfpmerge`.
pub fn default_scratch_dir() -> PathBuf {
    std::env::temp_dir().join("rfpmerge")
}
