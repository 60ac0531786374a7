//! Updater - sequences the version check and the update cycle
//!
//! The run is linear: read the local marker, fetch the remote head, and if
//! they differ sweep the directory, download and install the archive, and
//! record the new version. A failure at any step aborts the run and leaves
//! the directory as it was at that point.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::Result;
use crate::exclusions::ExclusionList;
use crate::github::{GitHubClient, RepoCoordinates};
use crate::installer::{self, InstallSummary};
use crate::sweep;
use crate::version::VersionStore;

/// Stages of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateState {
    Idle,
    VersionChecked,
    UpToDate,
    Updating,
    Done,
    Failed,
}

/// Local and remote versions as seen by a check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCheck {
    pub current: Option<String>,
    pub latest: String,
}

impl VersionCheck {
    pub fn is_up_to_date(&self) -> bool {
        self.current.as_deref() == Some(self.latest.as_str())
    }
}

/// Result of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Local marker already matched the remote head
    UpToDate { version: String },
    /// A full update cycle ran
    Updated {
        previous: Option<String>,
        current: String,
        removed: usize,
        installed: InstallSummary,
        duration: Duration,
    },
}

/// Keeps one directory in sync with one branch
pub struct Updater {
    root: PathBuf,
    coords: RepoCoordinates,
    client: GitHubClient,
    version_store: VersionStore,
    ignore_file: PathBuf,
    protected: Vec<String>,
    state: UpdateState,
}

impl Updater {
    pub fn new(config: &Config, root: &Path, coords: RepoCoordinates) -> Result<Self> {
        let client = GitHubClient::new(config)?;
        let version_store = VersionStore::new(root, &config.files.version_file);
        let ignore_file = root.join(&config.files.ignore_file);

        // The marker and the ignore file always survive a sweep
        let protected = vec![
            sweep::relative_path(root, version_store.path()),
            sweep::relative_path(root, &ignore_file),
        ];

        Ok(Self {
            root: root.to_path_buf(),
            coords,
            client,
            version_store,
            ignore_file,
            protected,
            state: UpdateState::Idle,
        })
    }

    pub fn state(&self) -> UpdateState {
        self.state
    }

    pub fn coordinates(&self) -> &RepoCoordinates {
        &self.coords
    }

    /// Compare the local marker with the remote branch head without changing anything
    pub async fn check(&mut self) -> Result<VersionCheck> {
        let result = self.check_inner().await;
        if result.is_err() {
            self.transition(UpdateState::Failed);
        }
        result
    }

    async fn check_inner(&mut self) -> Result<VersionCheck> {
        let current = self.version_store.read()?;
        debug!("Current version: {:?}", current);

        let latest = self.client.fetch_latest_version(&self.coords).await?;
        self.transition(UpdateState::VersionChecked);

        Ok(VersionCheck { current, latest })
    }

    /// Run a full check-and-update cycle
    pub async fn run(&mut self) -> Result<UpdateOutcome> {
        info!("Checking {} for updates", self.coords);

        let result = self.run_inner().await;
        if let Err(e) = &result {
            error!("Update failed: {}", e);
            self.transition(UpdateState::Failed);
        }
        result
    }

    async fn run_inner(&mut self) -> Result<UpdateOutcome> {
        let check = self.check_inner().await?;

        if check.is_up_to_date() {
            self.transition(UpdateState::UpToDate);
            info!("Already up to date at {}", check.latest);
            return Ok(UpdateOutcome::UpToDate {
                version: check.latest,
            });
        }

        self.transition(UpdateState::Updating);
        info!(
            "New version available: {} -> {}",
            check.current.as_deref().unwrap_or("unknown"),
            check.latest
        );

        let start_time = Instant::now();

        // A failed download keeps the old marker and the user's ignore file
        let exclusions = self
            .protected
            .iter()
            .fold(ExclusionList::resolve(&self.ignore_file)?, |list, entry| {
                list.with_entry(entry.clone())
            });
        let swept = sweep::sweep(&self.root, &exclusions)?;

        let archive = self.client.fetch_archive(&self.coords).await?;
        let installed = installer::install(&self.root, &archive, &self.coords.archive_root())?;
        drop(archive);

        self.version_store.write(&check.latest)?;
        self.transition(UpdateState::Done);

        Ok(UpdateOutcome::Updated {
            previous: check.current,
            current: check.latest,
            removed: swept.removed,
            installed,
            duration: start_time.elapsed(),
        })
    }

    fn transition(&mut self, next: UpdateState) {
        debug!("Updater state: {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_check_up_to_date() {
        let check = VersionCheck {
            current: Some("abc".to_string()),
            latest: "abc".to_string(),
        };
        assert!(check.is_up_to_date());
    }

    #[test]
    fn test_version_check_unknown_forces_update() {
        let check = VersionCheck {
            current: None,
            latest: "abc".to_string(),
        };
        assert!(!check.is_up_to_date());

        let check = VersionCheck {
            current: Some("old".to_string()),
            latest: "abc".to_string(),
        };
        assert!(!check.is_up_to_date());
    }

    #[test]
    fn test_new_updater_is_idle() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let updater = Updater::new(
            &Config::default(),
            temp_dir.path(),
            RepoCoordinates::new("octocat", "tool", None),
        )
        .unwrap();

        assert_eq!(updater.state(), UpdateState::Idle);
        assert_eq!(updater.coordinates().branch, "main");
        assert_eq!(updater.protected, vec!["version.txt", ".gitignore"]);
    }

    #[test]
    fn test_custom_files_are_protected() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let mut config = Config::default();
        config.files.version_file = "meta/VERSION".to_string();
        config.files.ignore_file = ".reposnapignore".to_string();

        let updater = Updater::new(
            &config,
            temp_dir.path(),
            RepoCoordinates::new("octocat", "tool", None),
        )
        .unwrap();

        assert_eq!(updater.protected, vec!["meta/VERSION", ".reposnapignore"]);
    }
}
