//! Common test utilities and helpers for reposnap tests
#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zip::write::SimpleFileOptions;

use reposnap::Config;

pub const OWNER: &str = "octocat";
pub const REPO: &str = "tool";
pub const BRANCH: &str = "main";

/// Temporary target directory plus a config pointing at a mock server
pub struct TestEnvironment {
    pub temp_dir: TempDir,
    pub root: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().join("target-dir");
        std::fs::create_dir_all(&root).expect("Failed to create target dir");

        Self { temp_dir, root }
    }

    pub fn write_file(&self, relative: &str, content: &str) {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        std::fs::write(path, content).expect("Failed to write test file");
    }

    pub fn read_file(&self, relative: &str) -> Option<String> {
        std::fs::read_to_string(self.root.join(relative)).ok()
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.root.join(relative).exists()
    }

    /// Write a config file for the binary and return its path
    pub fn write_config(&self, server: &MockServer) -> PathBuf {
        let config_path = self.temp_dir.path().join("config.yml");
        config_for(server)
            .save(&config_path)
            .expect("Failed to write test config");
        config_path
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Default config with both base URLs pointing at `server`
pub fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.remote.api_base_url = server.uri();
    config.remote.archive_base_url = server.uri();
    config.remote.timeout = 10;
    config
}

/// Build an in-memory zip; names ending in `/` become directory entries
pub fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, content) in entries {
        if name.ends_with('/') {
            writer
                .add_directory(*name, options)
                .expect("Failed to add directory");
        } else {
            writer.start_file(*name, options).expect("Failed to start file");
            writer
                .write_all(content.as_bytes())
                .expect("Failed to write entry");
        }
    }
    writer.finish().expect("Failed to finish zip").into_inner()
}

/// Branch archive as served for `tool@main`
pub fn sample_archive() -> Vec<u8> {
    build_zip(&[
        ("tool-main/", ""),
        ("tool-main/README.md", "# tool v2"),
        ("tool-main/main.py", "print('v2')"),
        ("tool-main/lib/", ""),
        ("tool-main/lib/helpers.py", "def helper(): pass"),
    ])
}

pub async fn mock_commit(server: &MockServer, sha: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/{}/{}/commits/{}", OWNER, REPO, BRANCH)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "sha": sha })),
        )
        .mount(server)
        .await;
}

pub async fn mock_commit_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/{}/{}/commits/{}", OWNER, REPO, BRANCH)))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

pub async fn mock_archive(server: &MockServer, bytes: Vec<u8>, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(format!(
            "/{}/{}/archive/refs/heads/{}.zip",
            OWNER, REPO, BRANCH
        )))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes))
        .expect(expected_calls)
        .mount(server)
        .await;
}

pub async fn mock_archive_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!(
            "/{}/{}/archive/refs/heads/{}.zip",
            OWNER, REPO, BRANCH
        )))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Assertion helper for command output
pub fn assert_contains_all(text: &str, expected: &[&str]) {
    for item in expected {
        assert!(
            text.contains(item),
            "Expected text to contain '{}', but it didn't. Text: {}",
            item,
            text
        );
    }
}
