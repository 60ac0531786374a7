//! Path prefixes preserved across an update sweep
//!
//! Patterns come from an ignore file in the target directory. Matching is a
//! plain prefix test on forward-slash relative paths, not glob matching, so
//! `.git` also covers `.github/` and `.gitattributes`.

use std::path::Path;
use tracing::debug;

use crate::error::{Result, UpdateError};

/// Entries appended to every resolved list: the ignore file itself and the
/// version-control directory.
pub const FIXED_EXCLUSIONS: [&str; 2] = [".gitignore", ".git"];

/// Immutable, ordered list of excluded path prefixes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionList {
    entries: Vec<String>,
}

impl ExclusionList {
    /// Read patterns from `ignore_file`, falling back to the fixed entries
    /// when the file does not exist.
    pub fn resolve(ignore_file: &Path) -> Result<Self> {
        match std::fs::read_to_string(ignore_file) {
            Ok(content) => {
                let list = Self::from_patterns(content.lines());
                debug!(
                    "Resolved {} exclusions from {:?}",
                    list.entries.len(),
                    ignore_file
                );
                Ok(list)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No ignore file at {:?}, using defaults", ignore_file);
                Ok(Self::from_patterns(std::iter::empty::<&str>()))
            }
            Err(e) => Err(UpdateError::io(ignore_file, e)),
        }
    }

    /// Build a list from raw pattern lines. Blank and `#` lines are dropped,
    /// and a leading `/` anchor is removed.
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut entries: Vec<String> = patterns
            .into_iter()
            .filter_map(|line| normalize(line.as_ref()))
            .collect();

        entries.extend(FIXED_EXCLUSIONS.iter().map(|e| e.to_string()));

        Self { entries }
    }

    /// Return a copy of this list with one more prefix appended
    pub fn with_entry(&self, prefix: impl Into<String>) -> Self {
        let mut entries = self.entries.clone();
        entries.push(prefix.into());
        Self { entries }
    }

    /// Whether a root-relative, forward-slash path starts with any prefix
    pub fn is_excluded(&self, relative_path: &str) -> bool {
        self.entries
            .iter()
            .any(|prefix| relative_path.starts_with(prefix.as_str()))
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }
}

fn normalize(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let line = line.trim_start_matches('/');
    if line.is_empty() {
        // A bare "/" would match everything
        return None;
    }

    Some(line.to_string())
}
