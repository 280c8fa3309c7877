//! Durable storage for the active conversation handle.
//!
//! The handle lives in a plain-text file that is mirrored against a remote
//! file-synchronization backend, so a restarted instance picks the
//! conversation back up on any machine. The remote copy wins; a missing
//! remote is seeded from the local copy, and if neither exists the file is
//! created with an initial value.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::Deserialize;
use std::{path::PathBuf, sync::Arc};
use switchboard_core::identity::IdentityStore;
use tracing::{debug, info};

/// Parses the raw content of the identity file into a conversation handle.
///
/// All subsequent sends depend on a valid handle, so non-numeric content is
/// an error, never a silent default.
pub fn parse_handle(raw: &str) -> Result<i64> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i64>()
        .with_context(|| format!("invalid conversation handle {trimmed:?} in identity file"))
}

/// Defines the contract for the remote side of file synchronization.
#[async_trait]
pub trait FileSync: Send + Sync {
    /// Fetches the remote copy of a file, or `None` if it does not exist.
    async fn fetch(&self, name: &str) -> Result<Option<String>>;

    /// Stores a file's content remotely, overwriting any previous copy.
    async fn store(&self, name: &str, content: &str) -> Result<()>;
}

/// Wire record of the file-synchronization backend.
#[derive(Deserialize)]
struct FileRecord {
    content: String,
}

/// An implementation of [`FileSync`] over the HTTP file-server backend.
pub struct HttpFileClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpFileClient {
    /// Creates a client for the backend at `base_url` (`FILE_SERVER_URL`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn file_url(&self, name: &str) -> String {
        format!("{}/files/{}", self.base_url, name)
    }
}

#[async_trait]
impl FileSync for HttpFileClient {
    async fn fetch(&self, name: &str) -> Result<Option<String>> {
        let response = self.http.get(self.file_url(name)).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            bail!("file server returned {} for {name}", response.status());
        }
        let record: FileRecord = response.json().await?;
        Ok(Some(record.content))
    }

    async fn store(&self, name: &str, content: &str) -> Result<()> {
        self.http
            .put(self.file_url(name))
            .json(&serde_json::json!({ "content": content }))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// A local plain-text file kept in sync with a remote backend.
///
/// This is the [`IdentityStore`] used in production: the conversation-handle
/// file (`./chat-id.txt` by default) synchronized through the configured
/// file server.
pub struct SyncedFile {
    remote: Arc<dyn FileSync>,
    path: PathBuf,
    name: String,
    initial: String,
}

impl SyncedFile {
    pub fn new(remote: Arc<dyn FileSync>, path: PathBuf, initial: impl Into<String>) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "chat-id.txt".to_string());
        Self {
            remote,
            path,
            name,
            initial: initial.into(),
        }
    }
}

#[async_trait]
impl IdentityStore for SyncedFile {
    async fn load_or_init(&self) -> Result<String> {
        if let Some(content) = self.remote.fetch(&self.name).await? {
            debug!(file = %self.name, "identity file found remotely");
            tokio::fs::write(&self.path, &content)
                .await
                .with_context(|| format!("failed to mirror {} locally", self.path.display()))?;
            return Ok(content);
        }

        if tokio::fs::try_exists(&self.path).await? {
            let content = tokio::fs::read_to_string(&self.path)
                .await
                .with_context(|| format!("failed to read {}", self.path.display()))?;
            info!(file = %self.name, "identity file missing remotely, pushing local copy");
            self.remote.store(&self.name, &content).await?;
            return Ok(content);
        }

        info!(file = %self.name, initial = %self.initial, "creating identity file");
        tokio::fs::write(&self.path, &self.initial)
            .await
            .with_context(|| format!("failed to create {}", self.path.display()))?;
        self.remote.store(&self.name, &self.initial).await?;
        Ok(self.initial.clone())
    }
}
