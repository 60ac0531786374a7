//! Error types for the update pipeline.
//!
//! Library code returns [`UpdateError`]; the binary wraps it in `anyhow` for
//! reporting.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while checking for or applying an update.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// A remote endpoint answered with something other than HTTP 200.
    #[error("request to {url} failed with status {status}")]
    Remote { status: u16, url: String },

    /// A filesystem read, write or delete failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The commit metadata did not contain the expected field.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The request never produced a response (DNS, connect, timeout).
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The downloaded payload is not a readable zip archive.
    #[error("invalid archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// A zip entry would be written outside the target directory.
    #[error("archive entry escapes the target directory: {0}")]
    UnsafeEntry(String),

    /// Directory traversal failed during the sweep.
    #[error("failed to walk directory tree: {0}")]
    Walk(#[from] walkdir::Error),
}

impl UpdateError {
    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        UpdateError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether this error came from the local filesystem rather than the remote.
    pub fn is_io(&self) -> bool {
        matches!(self, UpdateError::Io { .. } | UpdateError::Walk(_))
    }

    /// HTTP status carried by a [`UpdateError::Remote`] error.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpdateError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, UpdateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_message_includes_status() {
        let err = UpdateError::Remote {
            status: 404,
            url: "https://api.github.com/repos/a/b/commits/main".to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("404"));
        assert!(!err.is_io());
    }

    #[test]
    fn test_io_error_carries_path() {
        let err = UpdateError::io(
            "/tmp/version.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.is_io());
        assert!(err.to_string().contains("/tmp/version.txt"));
        assert_eq!(err.status(), None);
    }
}
