//! Output file naming.

use std::path::Path;

use crate::error::{MergeError, Result};

/// Suffix appended to the RFP stem for derived output names.
pub const MERGED_SUFFIX: &str = "_merged";

/// Output name for single-document mode: `<rfp stem>_merged.pdf`.
pub fn merged_name(rfp_name: &str) -> Result<String> {
    let file_name = sanitize(rfp_name)?;
    let stem = Path::new(&file_name)
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or(file_name);
    Ok(format!("{stem}{MERGED_SUFFIX}.pdf"))
}

/// Output name for batch mode.
///
/// Uses the user-supplied name with `.pdf` appended when missing, or falls
/// back to [`merged_name`] of the first RFP.
pub fn batch_output_name(user_name: Option<&str>, first_rfp: &str) -> Result<String> {
    match user_name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => {
            let name = sanitize(name)?;
            if has_pdf_extension(&name) {
                Ok(name)
            } else {
                Ok(format!("{name}.pdf"))
            }
        }
        None => merged_name(first_rfp),
    }
}

/// Reduce `name` to its final path component.
///
/// # Errors
///
/// Returns `InvalidConfig` for empty names and names without a usable final
/// component (such as `..`).
pub fn sanitize(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(MergeError::invalid_config("output name cannot be empty"));
    }

    Path::new(trimmed)
        .file_name()
        .map(|component| component.to_string_lossy().into_owned())
        .ok_or_else(|| MergeError::invalid_config(format!("invalid file name: {name}")))
}

fn has_pdf_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}
