//! File storage collaborator trait.
//!
//! The entity tree never touches the filesystem directly: stored files are
//! opaque objects addressed by the paths the storage path mapper produces.
//! The [`FileStorage`] trait is defined here in `foldershare-core` and
//! implemented in `foldershare-storage`.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// Metadata about a stored file.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StoredFileMeta {
    /// Path within the storage backend.
    pub path: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// MIME type (if known).
    pub mime_type: Option<String>,
    /// Last modified timestamp.
    pub last_modified: Option<chrono::DateTime<chrono::Utc>>,
}

/// A byte stream type used for reading stored file contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for the generic file storage collaborator.
#[async_trait]
pub trait FileStorage: Send + Sync + std::fmt::Debug + 'static {
    /// Return the backend type name (e.g., "local").
    fn backend_type(&self) -> &str;

    /// Check whether the backend is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Read a stored file and return its byte stream.
    async fn read(&self, path: &str) -> AppResult<ByteStream>;

    /// Read a stored file into memory as a complete byte vector.
    async fn read_bytes(&self, path: &str) -> AppResult<Bytes>;

    /// Write bytes to the given path, creating parent directories.
    async fn write(&self, path: &str, data: Bytes) -> AppResult<()>;

    /// Delete the stored file at the given path (no-op if absent).
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Copy a stored file from one path to another within this backend.
    async fn copy(&self, from: &str, to: &str) -> AppResult<()>;

    /// Check whether a stored file exists at the given path.
    async fn exists(&self, path: &str) -> AppResult<bool>;

    /// Get metadata about a stored file.
    async fn metadata(&self, path: &str) -> AppResult<StoredFileMeta>;
}
