//! Archive installer - unpacks a branch archive into the target directory
//!
//! Branch archives wrap the repository in a single top-level folder
//! (`{repo}-{branch}/`). Only entries under that folder are installed, with
//! the folder stripped from their paths.

use std::fs::File;
use std::io::Cursor;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{Result, UpdateError};

/// Counts from a completed install
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstallSummary {
    pub files_written: usize,
    pub directories_created: usize,
}

/// Extract every file entry under `root_prefix/` from `archive` into `root`,
/// overwriting existing files.
pub fn install(root: &Path, archive: &[u8], root_prefix: &str) -> Result<InstallSummary> {
    info!("Extracting files...");

    let mut zip = zip::ZipArchive::new(Cursor::new(archive))?;
    let prefix = format!("{}/", root_prefix.trim_end_matches('/'));
    let mut summary = InstallSummary::default();

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i)?;
        let name = entry.name().to_string();

        if name.ends_with('/') {
            continue;
        }

        let Some(relative) = name.strip_prefix(&prefix) else {
            warn!("Skipping entry outside {}: {}", prefix, name);
            continue;
        };

        let destination = destination_path(root, relative)?;

        if let Some(parent) = destination.parent() {
            if !parent.exists() {
                info!("Creating folder {}...", parent.display());
                std::fs::create_dir_all(parent).map_err(|e| UpdateError::io(parent, e))?;
                summary.directories_created += 1;
            }
        }

        let mut outfile =
            File::create(&destination).map_err(|e| UpdateError::io(&destination, e))?;
        std::io::copy(&mut entry, &mut outfile).map_err(|e| UpdateError::io(&destination, e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                std::fs::set_permissions(&destination, std::fs::Permissions::from_mode(mode))
                    .map_err(|e| UpdateError::io(&destination, e))?;
            }
        }

        debug!("Wrote {}", relative);
        summary.files_written += 1;
    }

    info!(
        "Installed {} files ({} new folders)",
        summary.files_written, summary.directories_created
    );

    Ok(summary)
}

/// Join `relative` onto `root`, rejecting anything that could escape it
fn destination_path(root: &Path, relative: &str) -> Result<PathBuf> {
    let relative_path = Path::new(relative);
    let mut has_normal = false;

    for component in relative_path.components() {
        match component {
            Component::Normal(_) => has_normal = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(UpdateError::UnsafeEntry(relative.to_string()));
            }
        }
    }

    if !has_normal {
        return Err(UpdateError::UnsafeEntry(relative.to_string()));
    }

    Ok(root.join(relative_path))
}
