use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything but RFC 3986 unreserved characters gets escaped in a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// URL prefix under which the upload directory is served.
pub const UPLOADS_MOUNT: &str = "/uploads";

#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()>;

    /// Public path a stored object is served from, percent-encoded.
    fn public_path(&self, key: &str) -> String;
}

/// Stores objects as flat files in one server-local directory.
#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
    mount: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, mount: &str) -> Self {
        Self {
            root: root.into(),
            mount: mount.trim_end_matches('/').to_string(),
        }
    }

    /// Like `new`, but creates the directory first if it does not exist.
    pub async fn create(root: &Path, mount: &str) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(root)
            .await
            .with_context(|| format!("create upload dir {}", root.display()))?;
        tracing::info!(dir = %root.display(), "upload directory ready");
        Ok(Self::new(root, mount))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> anyhow::Result<PathBuf> {
        anyhow::ensure!(
            !key.is_empty() && !key.contains(['/', '\\']) && key != "." && key != "..",
            "invalid object key {:?}",
            key
        );
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl StorageClient for LocalStorage {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()> {
        let path = self.path_for(key)?;
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write {}", path.display()))?;
        tracing::debug!(key, content_type, size = body.len(), "object stored");
        Ok(())
    }

    fn public_path(&self, key: &str) -> String {
        format!("{}/{}", self.mount, utf8_percent_encode(key, PATH_SEGMENT))
    }
}
