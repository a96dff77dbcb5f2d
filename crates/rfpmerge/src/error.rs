//! Error types for rfpmerge.
//!
//! Errors fall into three groups:
//!
//! - **Source errors**: a single input document could not be read. These are
//!   recoverable in batch mode and fatal in single-document mode.
//! - **Job errors**: nothing to merge, a required upload is missing, or the
//!   output could not be written.
//! - **Setup errors**: invalid configuration, archive problems, generic I/O.

use std::io;
use std::path::PathBuf;

/// Result type alias for rfpmerge operations.
pub type Result<T> = std::result::Result<T, MergeError>;

/// Main error type for rfpmerge operations.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// Input file was not found.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Failed to load a PDF document.
    #[error("Failed to load PDF: {label}\n  Reason: {reason}")]
    FailedToLoadPdf {
        /// Label of the document (file name or upload name).
        label: String,
        /// Reason for the failure.
        reason: String,
    },

    /// PDF is structurally unusable (e.g. has no pages).
    #[error("Corrupted or invalid PDF: {label}\n  Details: {details}")]
    CorruptedPdf {
        /// Label of the corrupted document.
        label: String,
        /// Details about the corruption.
        details: String,
    },

    /// PDF is encrypted and cannot be processed.
    #[error(
        "PDF is encrypted and cannot be processed: {label}\n  \
         Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools"
    )]
    EncryptedPdf {
        /// Label of the encrypted document.
        label: String,
    },

    /// No documents were available to merge.
    #[error("No documents to merge")]
    NoFilesToMerge,

    /// A merge was requested before every required upload was staged.
    #[error("Cannot merge yet: {what} has not been provided")]
    MissingInput {
        /// Which input is missing ("RFP document" or "response document").
        what: &'static str,
    },

    /// Failed to create the output file or its directory.
    #[error("Failed to create output file: {}\n  Reason: {source}", path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write the output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The ZIP archive could not be read.
    #[error("Failed to read archive: {name}\n  Reason: {reason}")]
    Archive {
        /// Upload name of the archive.
        name: String,
        /// Reason for the failure.
        reason: String,
    },

    /// A selected archive member does not exist in the extracted listing.
    #[error("Archive member not found: {name}")]
    MemberNotFound {
        /// Requested member name.
        name: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl From<lopdf::Error> for MergeError {
    fn from(err: lopdf::Error) -> Self {
        Self::other(err.to_string())
    }
}

impl MergeError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a FailedToLoadPdf error.
    pub fn failed_to_load_pdf(label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FailedToLoadPdf {
            label: label.into(),
            reason: reason.into(),
        }
    }

    /// Create a CorruptedPdf error.
    pub fn corrupted_pdf(label: impl Into<String>, details: impl Into<String>) -> Self {
        Self::CorruptedPdf {
            label: label.into(),
            details: details.into(),
        }
    }

    /// Create an EncryptedPdf error.
    pub fn encrypted_pdf(label: impl Into<String>) -> Self {
        Self::EncryptedPdf {
            label: label.into(),
        }
    }

    /// Create an Archive error.
    pub fn archive(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Archive {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if this error concerns a single source document.
    ///
    /// These are the errors batch mode reports and skips past.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound { .. }
                | Self::FailedToLoadPdf { .. }
                | Self::CorruptedPdf { .. }
                | Self::EncryptedPdf { .. }
        )
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::FailedToLoadPdf { .. } => 3,
            Self::CorruptedPdf { .. } => 3,
            Self::EncryptedPdf { .. } => 3,
            Self::NoFilesToMerge => 1,
            Self::MissingInput { .. } => 1,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::Archive { .. } => 3,
            Self::MemberNotFound { .. } => 2,
            Self::InvalidConfig { .. } => 1,
            Self::Io { .. } => 5,
            Self::Other { .. } => 1,
        }
    }
}
