//! reposnap - keep a directory in sync with the latest snapshot of a GitHub branch
//!
//! reposnap compares the head commit of a remote branch with a locally stored
//! version marker. When they differ it wipes the local files (preserving the
//! prefixes listed in the ignore file), installs the branch archive and
//! records the new version.
//!
//! ## Modules
//!
//! - [`config`]: Configuration management and parsing
//! - [`github`]: Commit lookup and archive download
//! - [`version`]: Version marker persistence
//! - [`exclusions`]: Ignore-file prefixes preserved across updates
//! - [`sweep`]: Removal of local files ahead of an install
//! - [`installer`]: Zip extraction with root-folder stripping
//! - [`updater`]: The check-and-update sequence

pub mod config;
pub mod error;
pub mod exclusions;
pub mod github;
pub mod installer;
pub mod sweep;
pub mod updater;
pub mod version;

pub use config::Config;
pub use error::{Result, UpdateError};
pub use exclusions::ExclusionList;
pub use github::{GitHubClient, RepoCoordinates};
pub use installer::InstallSummary;
pub use sweep::SweepSummary;
pub use updater::{UpdateOutcome, UpdateState, Updater, VersionCheck};
pub use version::VersionStore;
