//! User-facing output.
//!
//! [`OutputFormatter`] prints status messages honouring quiet and verbose
//! modes. The `display_*` helpers render merge results and archive listings
//! through it.

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use crate::archive::ArchiveMember;
use crate::merge::OutputDocument;
use crate::utils::format_file_size;

/// Display the outcome of a merge.
pub fn display_output(formatter: &OutputFormatter, output: &OutputDocument) {
    for skipped in &output.report.skipped {
        formatter.warning(&format!("Skipped {}: {}", skipped.label, skipped.reason));
    }

    formatter.success(&format!(
        "Created {} ({} pages, {})",
        output.path.display(),
        output.page_count,
        output.format_file_size()
    ));

    if formatter.is_verbose() {
        formatter.section("Documents");
        for merged in &output.report.merged {
            let pages = if merged.page_count == 1 {
                format!("page {}", merged.first_page + 1)
            } else {
                format!(
                    "pages {}-{}",
                    merged.first_page + 1,
                    merged.first_page + merged.page_count
                )
            };
            formatter.detail(&merged.label, &pages);
        }
    }
}

/// Display the members of an extracted archive.
pub fn display_archive_members(formatter: &OutputFormatter, name: &str, members: &[ArchiveMember]) {
    formatter.info(&format!("{name}: {} member(s)", members.len()));
    for (index, member) in members.iter().enumerate() {
        formatter.list_item(
            index + 1,
            &format!("{} ({})", member.name, format_file_size(member.size)),
        );
    }
}
