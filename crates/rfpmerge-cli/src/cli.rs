//! CLI argument parsing for rfpmerge.

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use rfpmerge::config::{CompressionLevel, Config, DEFAULT_OUTPUT_DIR, ErrorPolicy, default_scratch_dir};
use rfpmerge::error::{MergeError, Result};

/// Merge RFP documents and their response into a single PDF.
///
/// The output contains the RFP documents in order, an "RFP RESPONSE" divider
/// page, and then the response document.
#[derive(Parser, Debug)]
#[command(name = "rfpmerge")]
#[command(version)]
#[command(about = "Merge RFP documents and their response into a single PDF", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// RFP documents to merge (in order)
    ///
    /// Glob patterns are expanded and sorted.
    ///
    /// Examples:
    ///   rfpmerge --rfp tender.pdf --response answer.pdf
    ///   rfpmerge --rfp 'lots/*.pdf' --response answer.pdf -o bundle
    #[arg(long, value_name = "FILE", num_args = 1..)]
    pub rfp: Vec<String>,

    /// ZIP archive containing RFP documents
    ///
    /// Archive members are merged after any --rfp documents.
    #[arg(long, value_name = "ZIP")]
    pub archive: Option<PathBuf>,

    /// Archive members to merge, in order
    ///
    /// Defaults to every .pdf member in archive order.
    #[arg(long, value_name = "NAME", num_args = 1.., requires = "archive")]
    pub select: Vec<String>,

    /// List the archive's members and exit
    #[arg(long, requires = "archive")]
    pub list_archive: bool,

    /// The response document
    #[arg(long, value_name = "FILE", required_unless_present = "list_archive")]
    pub response: Option<PathBuf>,

    /// Output file name (used when merging more than one RFP)
    ///
    /// ".pdf" is appended when missing. A single RFP is always written as
    /// "<rfp name>_merged.pdf".
    #[arg(short, long, value_name = "NAME")]
    pub output: Option<String>,

    /// Directory merged documents are written to
    #[arg(long, value_name = "DIR", env = "RFPMERGE_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Directory for staged uploads and extracted archives
    #[arg(long, value_name = "DIR", env = "RFPMERGE_SCRATCH_DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// Skip unreadable documents instead of aborting
    ///
    /// This is the default when merging more than one RFP.
    #[arg(long)]
    pub continue_on_error: bool,

    /// Abort on the first unreadable document
    ///
    /// This is the default when merging a single RFP.
    #[arg(long, conflicts_with = "continue_on_error")]
    pub abort_on_error: bool,

    /// Do not insert the "RFP RESPONSE" divider page
    #[arg(long)]
    pub no_divider: bool,

    /// Compression level for output PDF
    ///
    /// - none: No compression
    /// - standard: Compress streams (default)
    /// - maximum: Compress streams and renumber objects
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print the merge report (or archive listing) as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns an error if the compression level is invalid or the resulting
    /// configuration fails validation.
    pub fn to_config(&self) -> Result<Config> {
        let compression = CompressionLevel::from_str(&self.compression)?;

        let error_policy = if self.continue_on_error {
            Some(ErrorPolicy::SkipFailed)
        } else if self.abort_on_error {
            Some(ErrorPolicy::Abort)
        } else {
            None
        };

        let config = Config {
            output_dir: self.output_dir.clone(),
            scratch_dir: self.scratch_dir.clone().unwrap_or_else(default_scratch_dir),
            error_policy,
            divider: !self.no_divider,
            compression,
            verbose: self.verbose && !self.json,
            quiet: self.quiet || self.json,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate CLI arguments before any file is touched.
    ///
    /// # Errors
    ///
    /// Returns an error if no RFP source was given, or if archive-only flags
    /// are used without an archive.
    pub fn validate(&self) -> Result<()> {
        if self.archive.is_none() {
            if self.list_archive || !self.select.is_empty() {
                return Err(MergeError::invalid_config(
                    "--list-archive and --select require --archive",
                ));
            }
            if self.rfp.is_empty() {
                return Err(MergeError::invalid_config(
                    "Specify at least one --rfp document or an --archive",
                ));
            }
        }

        if !self.list_archive && self.response.is_none() {
            return Err(MergeError::MissingInput {
                what: "response document",
            });
        }

        Ok(())
    }
}
