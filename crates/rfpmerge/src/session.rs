//! Merge sessions.
//!
//! A [`MergeSession`] holds everything one requester has staged: the RFP
//! documents, the response, an extracted archive and the chosen output name.
//! Uploads are copied into a scratch directory owned by the session under
//! generated names, so two uploads called `rfp.pdf` never overwrite each
//! other. The scratch directory is removed when the session is dropped.
//!
//! # Examples
//!
//! ```no_run
//! use rfpmerge::config::Config;
//! use rfpmerge::session::MergeSession;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut session = MergeSession::start(&Config::default()).await?;
//! session.stage_rfp_path("tender.pdf").await?;
//! session.stage_response_path("answer.pdf").await?;
//!
//! let output = session.merge().await?;
//! let bytes = session.read_output(&output).await?;
//! println!("{} ({} bytes)", output.file_name(), bytes.len());
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::archive::{ArchiveMember, ExtractedArchive, extract_archive};
use crate::config::{Config, ErrorPolicy};
use crate::error::{MergeError, Result};
use crate::io::{DocumentSource, PdfWriter};
use crate::merge::{Concatenator, MergeJob, OutputDocument, SkippedDocument};
use crate::naming;

/// How many RFP documents a merge combines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMode {
    /// Exactly one RFP document.
    Single,
    /// Any other number of RFP documents.
    Batch,
}

impl MergeMode {
    /// Error policy used when the configuration does not override it.
    pub fn default_policy(self) -> ErrorPolicy {
        match self {
            Self::Single => ErrorPolicy::Abort,
            Self::Batch => ErrorPolicy::SkipFailed,
        }
    }
}

/// An input copied into scratch storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedDocument {
    /// Name the document was uploaded under.
    pub original_name: String,
    /// Location in scratch storage.
    pub path: PathBuf,
}

impl StagedDocument {
    fn source(&self) -> DocumentSource {
        DocumentSource::labelled_path(&self.original_name, &self.path)
    }
}

/// State of one requester's merge.
#[derive(Debug)]
pub struct MergeSession {
    id: Uuid,
    dir: PathBuf,
    config: Config,
    writer: PdfWriter,
    rfps: Vec<StagedDocument>,
    unreadable: Vec<SkippedDocument>,
    response: Option<StagedDocument>,
    archive: Option<ExtractedArchive>,
    output_name: Option<String>,
}

impl MergeSession {
    /// Validate `config` and create a fresh scratch directory.
    pub async fn start(config: &Config) -> Result<Self> {
        config.validate()?;

        let id = Uuid::new_v4();
        let dir = config.scratch_dir.join(id.to_string());
        tokio::fs::create_dir_all(&dir).await?;

        tracing::debug!(session = %id, dir = %dir.display(), "Started merge session");

        Ok(Self {
            id,
            dir,
            config: config.clone(),
            writer: PdfWriter::new(),
            rfps: Vec::new(),
            unreadable: Vec::new(),
            response: None,
            archive: None,
            output_name: None,
        })
    }

    /// Session identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Scratch directory owned by this session.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Staged RFP documents, in merge order.
    pub fn rfps(&self) -> &[StagedDocument] {
        &self.rfps
    }

    /// The staged response document.
    pub fn response(&self) -> Option<&StagedDocument> {
        self.response.as_ref()
    }

    /// Members of the extracted archive, if one was staged.
    pub fn archive_members(&self) -> Option<&[ArchiveMember]> {
        self.archive.as_ref().map(|archive| archive.members.as_slice())
    }

    /// Stage an RFP upload. RFPs are merged in the order they are staged.
    pub async fn stage_rfp(&mut self, name: &str, bytes: Vec<u8>) -> Result<&StagedDocument> {
        let staged = self.write_staged(name, bytes).await?;
        self.rfps.push(staged);
        Ok(&self.rfps[self.rfps.len() - 1])
    }

    /// Stage the response upload, replacing any earlier one.
    pub async fn stage_response(&mut self, name: &str, bytes: Vec<u8>) -> Result<&StagedDocument> {
        let staged = self.write_staged(name, bytes).await?;
        if let Some(previous) = self.response.take() {
            let _ = tokio::fs::remove_file(&previous.path).await;
        }
        Ok(self.response.insert(staged))
    }

    /// Stage an RFP from a file on disk.
    pub async fn stage_rfp_path(&mut self, path: impl AsRef<Path>) -> Result<&StagedDocument> {
        let (name, bytes) = read_upload(path.as_ref()).await?;
        self.stage_rfp(&name, bytes).await
    }

    /// Stage the response from a file on disk.
    pub async fn stage_response_path(&mut self, path: impl AsRef<Path>) -> Result<&StagedDocument> {
        let (name, bytes) = read_upload(path.as_ref()).await?;
        self.stage_response(&name, bytes).await
    }

    /// Count an RFP that could not even be staged.
    ///
    /// It decides the mode like any staged RFP and is reported under
    /// `skipped` when the merge runs.
    pub fn record_unreadable_rfp(&mut self, name: &str, error: &MergeError) {
        tracing::warn!(session = %self.id, name, error = %error, "RFP could not be staged");
        self.unreadable.push(SkippedDocument {
            label: name.to_string(),
            reason: error.to_string(),
        });
    }

    /// Extract an archive upload and return its member names in archive
    /// order. A later archive replaces an earlier one.
    pub async fn stage_archive(&mut self, name: &str, bytes: Vec<u8>) -> Result<Vec<String>> {
        let dest = self.dir.join(format!("archive-{}", Uuid::new_v4()));
        let extracted = extract_archive(name, bytes, &dest).await?;
        let names = extracted.member_names();

        if let Some(previous) = self.archive.replace(extracted) {
            let _ = tokio::fs::remove_dir_all(&previous.dir).await;
        }
        Ok(names)
    }

    /// Stage the named archive members as RFPs, in the given order.
    ///
    /// # Errors
    ///
    /// - `MissingInput` if no archive was staged
    /// - `MemberNotFound` for a name that is not in the archive; nothing is
    ///   staged in that case
    pub fn select_archive_members<S: AsRef<str>>(&mut self, names: &[S]) -> Result<usize> {
        let archive = self
            .archive
            .as_ref()
            .ok_or(MergeError::MissingInput { what: "archive" })?;

        let selected: Vec<StagedDocument> = archive
            .select(names)?
            .into_iter()
            .map(|member| StagedDocument {
                original_name: member.name.clone(),
                path: member.path.clone(),
            })
            .collect();

        let count = selected.len();
        self.rfps.extend(selected);
        Ok(count)
    }

    /// Stage every `.pdf` member of the archive, in archive order.
    pub fn select_archive_pdfs(&mut self) -> Result<usize> {
        let names: Vec<String> = self
            .archive
            .as_ref()
            .ok_or(MergeError::MissingInput { what: "archive" })?
            .pdf_members()
            .map(|member| member.name.clone())
            .collect();
        self.select_archive_members(&names)
    }

    /// Output name used in batch mode.
    pub fn set_output_name(&mut self, name: impl Into<String>) {
        self.output_name = Some(name.into());
    }

    /// Whether at least one RFP and a response are staged.
    pub fn is_ready(&self) -> bool {
        !self.rfps.is_empty() && self.response.is_some()
    }

    /// Single when exactly one RFP was provided, otherwise batch.
    pub fn mode(&self) -> MergeMode {
        if self.rfps.len() + self.unreadable.len() == 1 {
            MergeMode::Single
        } else {
            MergeMode::Batch
        }
    }

    /// Error policy the next merge will run with.
    pub fn error_policy(&self) -> ErrorPolicy {
        self.config
            .error_policy
            .unwrap_or_else(|| self.mode().default_policy())
    }

    /// File name the next merge will write.
    pub fn output_name(&self) -> Result<String> {
        let first = self.rfps.first().ok_or(MergeError::MissingInput {
            what: "RFP document",
        })?;

        match self.mode() {
            MergeMode::Single => naming::merged_name(&first.original_name),
            MergeMode::Batch => {
                naming::batch_output_name(self.output_name.as_deref(), &first.original_name)
            }
        }
    }

    /// Merge the staged RFPs, divider and response into the output directory.
    ///
    /// The staged inputs and the output name are cleared afterwards, whether
    /// or not the merge succeeded.
    ///
    /// # Errors
    ///
    /// - `MissingInput` if an RFP or the response has not been staged
    /// - `InvalidConfig` for an unusable output name
    /// - Any error from the concatenator under the active [`ErrorPolicy`]
    pub async fn merge(&mut self) -> Result<OutputDocument> {
        let result = self.run_merge().await;

        if let Err(e) = self.clear_staged().await {
            tracing::warn!(session = %self.id, error = %e, "Failed to clear staged inputs");
        }
        result
    }

    async fn run_merge(&self) -> Result<OutputDocument> {
        let response = self.response.as_ref().ok_or(MergeError::MissingInput {
            what: "response document",
        })?;
        let output_path = self.config.output_dir.join(self.output_name()?);
        let policy = self.error_policy();

        tracing::info!(
            session = %self.id,
            mode = ?self.mode(),
            policy = ?policy,
            rfps = self.rfps.len(),
            output = %output_path.display(),
            "Merging"
        );

        let job = MergeJob::new(output_path)
            .rfps(self.rfps.iter().map(StagedDocument::source))
            .with_divider(self.config.divider)
            .response(response.source());

        let mut output = Concatenator::new(policy)
            .with_compression(self.config.compression)
            .run(job)
            .await?;

        let mut skipped = self.unreadable.clone();
        skipped.append(&mut output.report.skipped);
        output.report.skipped = skipped;
        Ok(output)
    }

    /// Read a merged document back for download.
    pub async fn read_output(&self, output: &OutputDocument) -> Result<Vec<u8>> {
        self.writer.read_back(&output.path).await
    }

    /// Discard everything staged without producing output.
    pub async fn reset(&mut self) -> Result<()> {
        self.clear_staged().await
    }

    async fn write_staged(&self, name: &str, bytes: Vec<u8>) -> Result<StagedDocument> {
        let path = self.dir.join(format!("{}.pdf", Uuid::new_v4()));
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| MergeError::FailedToWrite {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(name, path = %path.display(), "Staged upload");

        Ok(StagedDocument {
            original_name: name.to_string(),
            path,
        })
    }

    async fn clear_staged(&mut self) -> Result<()> {
        self.rfps.clear();
        self.unreadable.clear();
        self.response = None;
        self.archive = None;
        self.output_name = None;

        match tokio::fs::remove_dir_all(&self.dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }
}

impl Drop for MergeSession {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.dir) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!(session = %self.id, error = %e, "Failed to remove scratch directory");
            }
        }
    }
}

async fn read_upload(path: &Path) -> Result<(String, Vec<u8>)> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MergeError::file_not_found(path.to_path_buf())
        } else {
            MergeError::from(e)
        }
    })?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok((name, bytes))
}
