//! File sweep - removes local files ahead of an archive install
//!
//! The tree is walked contents-first. Every file whose root-relative path is
//! not covered by the exclusion list is deleted. Directories are left in place.

use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{Result, UpdateError};
use crate::exclusions::ExclusionList;

/// Counts from a completed sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub removed: usize,
    pub preserved: usize,
}

/// Delete every non-excluded file under `root`. Not reversible.
pub fn sweep(root: &Path, exclusions: &ExclusionList) -> Result<SweepSummary> {
    info!("Removing old files...");

    let mut summary = SweepSummary::default();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .contents_first(true)
    {
        let entry = entry?;

        if entry.file_type().is_dir() {
            continue;
        }

        let path = entry.path();
        let relative = relative_path(root, path);

        if exclusions.is_excluded(&relative) {
            debug!("Preserving {}", relative);
            summary.preserved += 1;
            continue;
        }

        std::fs::remove_file(path).map_err(|e| UpdateError::io(path, e))?;
        debug!("Removed {}", relative);
        summary.removed += 1;
    }

    info!(
        "Removed {} files, preserved {}",
        summary.removed, summary.preserved
    );

    Ok(summary)
}

/// Path of `path` relative to `root`, joined with forward slashes
pub(crate) fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
