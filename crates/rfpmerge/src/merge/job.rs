//! Merge jobs: which documents go into the output, and in what order.

use serde::Serialize;
use std::path::PathBuf;

use crate::divider::DividerPage;
use crate::error::{MergeError, Result};
use crate::io::DocumentSource;

/// The part a document plays in a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentRole {
    /// Request for Proposal content.
    Rfp,
    /// The generated "RFP RESPONSE" page.
    Divider,
    /// The answering document.
    Response,
}

/// An ordered set of documents plus the output destination.
///
/// Whatever order the builder methods are called in, the sources come out as
/// `[RFP documents…, divider, response]`.
#[derive(Debug, Clone)]
pub struct MergeJob {
    rfps: Vec<DocumentSource>,
    divider: bool,
    response: Option<DocumentSource>,
    output_path: PathBuf,
}

impl MergeJob {
    /// Start a job writing to `output_path`.
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            rfps: Vec::new(),
            divider: false,
            response: None,
            output_path: output_path.into(),
        }
    }

    /// Append an RFP document.
    pub fn rfp(mut self, source: DocumentSource) -> Self {
        self.rfps.push(source);
        self
    }

    /// Append several RFP documents, keeping their order.
    pub fn rfps(mut self, sources: impl IntoIterator<Item = DocumentSource>) -> Self {
        self.rfps.extend(sources);
        self
    }

    /// Include or omit the divider page.
    pub fn with_divider(mut self, divider: bool) -> Self {
        self.divider = divider;
        self
    }

    /// Set the response document.
    pub fn response(mut self, source: DocumentSource) -> Self {
        self.response = Some(source);
        self
    }

    /// Flatten the job into its ordered sources.
    ///
    /// # Errors
    ///
    /// Returns `MissingInput` if no response document was set.
    pub fn into_sources(self) -> Result<(Vec<(DocumentRole, DocumentSource)>, PathBuf)> {
        let response = self.response.ok_or(MergeError::MissingInput {
            what: "response document",
        })?;

        let mut sources: Vec<(DocumentRole, DocumentSource)> = self
            .rfps
            .into_iter()
            .map(|source| (DocumentRole::Rfp, source))
            .collect();

        if self.divider {
            sources.push((DocumentRole::Divider, DividerPage::source()));
        }
        sources.push((DocumentRole::Response, response));

        Ok((sources, self.output_path))
    }
}
