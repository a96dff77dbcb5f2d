//! ZIP archive extraction.
//!
//! An uploaded archive is unpacked into a scratch directory. The caller gets
//! back the member names (in archive order) and picks which ones to merge.

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use tokio::task;

use crate::error::{MergeError, Result};

/// Largest uncompressed member accepted from an archive.
pub const MAX_MEMBER_SIZE: u64 = 512 * 1024 * 1024;

/// Upper bound on the buffer reserved up front for one member.
const INITIAL_BUFFER_LIMIT: u64 = 1024 * 1024;

/// A file extracted from an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveMember {
    /// Name of the member inside the archive (may contain `/`).
    pub name: String,
    /// Where the member was written.
    pub path: PathBuf,
    /// Uncompressed size in bytes.
    pub size: u64,
}

impl ArchiveMember {
    /// Whether the member name has a `.pdf` extension (case-insensitive).
    pub fn is_pdf(&self) -> bool {
        Path::new(&self.name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
    }
}

/// The result of extracting an archive.
#[derive(Debug, Clone)]
pub struct ExtractedArchive {
    /// Upload name of the archive.
    pub name: String,
    /// Directory the members were written to.
    pub dir: PathBuf,
    /// Extracted files, in archive order.
    pub members: Vec<ArchiveMember>,
}

impl ExtractedArchive {
    /// Names of all extracted members, in archive order.
    pub fn member_names(&self) -> Vec<String> {
        self.members.iter().map(|m| m.name.clone()).collect()
    }

    /// Members with a `.pdf` extension, in archive order.
    pub fn pdf_members(&self) -> impl Iterator<Item = &ArchiveMember> {
        self.members.iter().filter(|m| m.is_pdf())
    }

    /// Look up members by name, in the order requested.
    ///
    /// # Errors
    ///
    /// Returns `MemberNotFound` for the first name that isn't in the archive.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&ArchiveMember>> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.members
                    .iter()
                    .find(|m| m.name == name)
                    .ok_or_else(|| MergeError::MemberNotFound {
                        name: name.to_string(),
                    })
            })
            .collect()
    }
}

/// Extract the archive `bytes` into `dest`.
///
/// Directory entries are skipped, as are members whose names would resolve
/// outside `dest`. A member that declares more than [`MAX_MEMBER_SIZE`]
/// bytes, or whose contents do not match its declared size, fails the whole
/// archive with `MergeError::Archive`.
pub async fn extract_archive(name: &str, bytes: Vec<u8>, dest: &Path) -> Result<ExtractedArchive> {
    let name = name.to_string();
    let dest = dest.to_path_buf();

    task::spawn_blocking(move || extract_blocking(name, bytes, dest))
        .await
        .map_err(|e| MergeError::other(format!("Extract task failed: {e}")))?
}

fn extract_blocking(name: String, bytes: Vec<u8>, dest: PathBuf) -> Result<ExtractedArchive> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| MergeError::archive(&name, e.to_string()))?;

    std::fs::create_dir_all(&dest)?;

    let mut members = Vec::new();
    for index in 0..archive.len() {
        let mut file = archive
            .by_index(index)
            .map_err(|e| MergeError::archive(&name, e.to_string()))?;

        if file.is_dir() {
            continue;
        }

        let Some(relative) = file.enclosed_name() else {
            tracing::warn!(archive = %name, member = %file.name(), "Skipping unsafe archive member");
            continue;
        };

        let path = dest.join(&relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let declared = file.size();
        if declared > MAX_MEMBER_SIZE {
            return Err(MergeError::archive(
                &name,
                format!("member {} declares {declared} bytes", file.name()),
            ));
        }

        let mut contents = Vec::with_capacity(declared.min(INITIAL_BUFFER_LIMIT) as usize);
        (&mut file)
            .take(declared + 1)
            .read_to_end(&mut contents)
            .map_err(|e| MergeError::archive(&name, e.to_string()))?;
        if contents.len() as u64 != declared {
            return Err(MergeError::archive(
                &name,
                format!(
                    "member {} is {} bytes but declares {declared}",
                    file.name(),
                    contents.len()
                ),
            ));
        }
        std::fs::write(&path, &contents)?;

        members.push(ArchiveMember {
            name: file.name().to_string(),
            path,
            size: contents.len() as u64,
        });
    }

    tracing::debug!(archive = %name, members = members.len(), "Extracted archive");

    Ok(ExtractedArchive {
        name,
        dir: dest,
        members,
    })
}
