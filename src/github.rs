use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::fmt;
use tracing::{debug, info};

use crate::config::{Config, DEFAULT_BRANCH};
use crate::error::{Result, UpdateError};

/// Owner, repository and branch identifying the tracked snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCoordinates {
    pub owner: String,
    pub repo: String,
    pub branch: String,
}

impl RepoCoordinates {
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        branch: Option<String>,
    ) -> Self {
        let branch = branch
            .map(|b| b.trim().to_string())
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| DEFAULT_BRANCH.to_string());

        Self {
            owner: owner.into().trim().to_string(),
            repo: repo.into().trim().to_string(),
            branch,
        }
    }

    /// Commit lookup URL for the branch head
    pub fn commits_url(&self, api_base_url: &str) -> String {
        format!(
            "{}/repos/{}/{}/commits/{}",
            api_base_url.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.branch
        )
    }

    /// Download URL for the branch zip archive
    pub fn archive_url(&self, archive_base_url: &str) -> String {
        format!(
            "{}/{}/{}/archive/refs/heads/{}.zip",
            archive_base_url.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.branch
        )
    }

    /// Top-level folder inside the branch archive. Slashes in branch names
    /// become dashes.
    pub fn archive_root(&self) -> String {
        format!("{}-{}", self.repo, self.branch.replace('/', "-"))
    }
}

impl fmt::Display for RepoCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.repo, self.branch)
    }
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    sha: Option<String>,
}

/// Thin GitHub client covering the two public endpoints reposnap needs
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    api_base_url: String,
    archive_base_url: String,
}

impl GitHubClient {
    /// Create a client from the remote section of the configuration
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );

        let mut builder = Client::builder()
            .user_agent(config.user_agent())
            .default_headers(headers);

        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            api_base_url: config.remote.api_base_url.clone(),
            archive_base_url: config.remote.archive_base_url.clone(),
        })
    }

    /// Fetch the commit SHA at the head of the branch
    pub async fn fetch_latest_version(&self, coords: &RepoCoordinates) -> Result<String> {
        let url = coords.commits_url(&self.api_base_url);
        debug!("Fetching latest commit from {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(UpdateError::Remote {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.bytes().await?;
        let commit: CommitResponse = serde_json::from_slice(&body).map_err(|e| {
            UpdateError::MalformedResponse(format!("invalid commit JSON from {}: {}", url, e))
        })?;

        let sha = commit
            .sha
            .filter(|sha| !sha.trim().is_empty())
            .ok_or_else(|| {
                UpdateError::MalformedResponse(format!("missing \"sha\" field in response from {}", url))
            })?;

        info!("Latest commit for {} is {}", coords, sha);
        Ok(sha)
    }

    /// Download the branch archive into memory
    pub async fn fetch_archive(&self, coords: &RepoCoordinates) -> Result<Vec<u8>> {
        let url = coords.archive_url(&self.archive_base_url);
        info!("Downloading repository...");
        debug!("Archive URL: {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(UpdateError::Remote {
                status: status.as_u16(),
                url,
            });
        }

        let bytes = response.bytes().await?;
        debug!("Downloaded {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}
