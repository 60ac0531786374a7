//! Version marker persistence
//!
//! The marker is a flat file under the target directory holding the commit
//! SHA of the last applied update.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Result, UpdateError};

/// Reads and writes the version marker file
#[derive(Debug, Clone)]
pub struct VersionStore {
    path: PathBuf,
}

impl VersionStore {
    pub fn new(root: &Path, file_name: &str) -> Self {
        Self {
            path: root.join(file_name),
        }
    }

    /// Location of the marker file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the stored commit, or `None` if no update has been applied yet
    pub fn read(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let version = content.trim();
                if version.is_empty() {
                    debug!("Version marker {:?} is empty", self.path);
                    Ok(None)
                } else {
                    Ok(Some(version.to_string()))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No version marker at {:?}", self.path);
                Ok(None)
            }
            Err(e) => Err(UpdateError::io(&self.path, e)),
        }
    }

    /// Overwrite the marker with `version`
    pub fn write(&self, version: &str) -> Result<()> {
        std::fs::write(&self.path, version).map_err(|e| UpdateError::io(&self.path, e))?;
        info!("Updated version to {}", version);
        Ok(())
    }
}
