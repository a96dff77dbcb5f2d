//! Utilities for path collection and display formatting.

use crate::error::{MergeError, Result};
use std::path::PathBuf;

/// Expand path arguments that may contain glob patterns.
///
/// Arguments without glob metacharacters are passed through untouched (even
/// if they don't exist yet) so that a later load reports a proper
/// "file not found". Pattern matches are sorted, which keeps numbered inputs
/// such as `rfp-1.pdf, rfp-2.pdf` in their natural order.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        if is_glob(pattern) {
            resolved_paths.extend(collect_paths_for_pattern(pattern)?);
        } else {
            resolved_paths.push(PathBuf::from(pattern));
        }
    }

    Ok(resolved_paths)
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Expand a single glob pattern into filesystem paths.
fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern)
        .map_err(|err| MergeError::invalid_config(format!("Invalid pattern {pattern}: {err}")))?;

    let mut resolved_paths = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| MergeError::other(err.to_string()))?;
        if path.is_file() {
            resolved_paths.push(path);
        }
    }

    if resolved_paths.is_empty() {
        return Err(MergeError::invalid_config(format!(
            "No files match pattern: {pattern}"
        )));
    }

    resolved_paths.sort();
    Ok(resolved_paths)
}

/// Format a byte count as a human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
