use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for reposnap
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    /// Repository to track (any missing value is prompted for)
    #[serde(default)]
    pub repository: RepositoryConfig,

    /// Remote endpoints and HTTP client settings
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Local file names inside the target directory
    #[serde(default)]
    pub files: FilesConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Repository coordinates stored in the config file
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RepositoryConfig {
    /// GitHub user or organization owning the repository
    pub owner: Option<String>,

    /// Repository name
    pub name: Option<String>,

    /// Branch to track
    pub branch: Option<String>,
}

/// Remote endpoint configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RemoteConfig {
    /// Base URL of the REST API used for commit lookups
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Base URL serving branch archives
    #[serde(default = "default_archive_base_url")]
    pub archive_base_url: String,

    /// User-Agent header override; unset sends `reposnap/<running version>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Request timeout in seconds (0 disables the timeout)
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// File names used inside the target directory
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FilesConfig {
    /// Version marker holding the last applied commit
    #[serde(default = "default_version_file")]
    pub version_file: String,

    /// Ignore file listing path prefixes preserved across updates
    #[serde(default = "default_ignore_file")]
    pub ignore_file: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String, // "info"
}

pub const DEFAULT_BRANCH: &str = "main";

// Default value functions
fn default_api_base_url() -> String {
    "https://api.github.com".to_string()
}
fn default_archive_base_url() -> String {
    "https://github.com".to_string()
}
fn default_user_agent() -> String {
    format!("reposnap/{}", env!("CARGO_PKG_VERSION"))
}
fn default_timeout() -> u64 {
    300
}
fn default_version_file() -> String {
    "version.txt".to_string()
}
fn default_ignore_file() -> String {
    ".gitignore".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            archive_base_url: default_archive_base_url(),
            user_agent: None,
            timeout: default_timeout(),
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            version_file: default_version_file(),
            ignore_file: default_ignore_file(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from the default location or create a default config
    pub fn load_or_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load(&config_path)
        } else {
            let config = Self::default();

            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
            }

            config.save(&config_path)?;

            tracing::info!("Created default configuration at: {:?}", config_path);
            Ok(config)
        }
    }

    /// Load configuration from a specific file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let mut config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        config.expand_paths()?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_yaml::to_string(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    /// Get the default configuration file path (XDG compliant)
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = config_dir().context("Failed to get user config directory")?;

        Ok(config_dir.join("reposnap").join("config.yml"))
    }

    /// Expand environment variables in configured file names
    pub fn expand_paths(&mut self) -> Result<()> {
        self.files.version_file = shellexpand::full(&self.files.version_file)
            .context("Failed to expand version_file path")?
            .into_owned();

        self.files.ignore_file = shellexpand::full(&self.files.ignore_file)
            .context("Failed to expand ignore_file path")?
            .into_owned();

        Ok(())
    }

    /// User-Agent header for outgoing requests
    pub fn user_agent(&self) -> String {
        self.remote
            .user_agent
            .clone()
            .unwrap_or_else(default_user_agent)
    }

    /// Request timeout, or `None` when disabled
    pub fn request_timeout(&self) -> Option<std::time::Duration> {
        match self.remote.timeout {
            0 => None,
            secs => Some(std::time::Duration::from_secs(secs)),
        }
    }
}
