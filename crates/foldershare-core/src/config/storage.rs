//! File storage and storage-path-mapper configuration.

use serde::{Deserialize, Serialize};

/// File storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for all stored files.
    #[serde(default = "default_root_path")]
    pub root_path: String,
    /// Digits per directory level when mapping a file id to a path.
    ///
    /// The 20-digit zero-padded id is split into fixed-width groups of this
    /// many digits; the final group is the stored file's name. This bounds
    /// per-directory entry counts regardless of corpus size.
    #[serde(default = "default_digits_per_level")]
    pub digits_per_level: u32,
    /// Public base URL of this server, used to build download URLs.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Route prefix for the access-controlled download handler.
    #[serde(default = "default_download_route")]
    pub download_route: String,
    /// Maximum accepted upload size in bytes.
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Maximum number of members accepted when unarchiving a ZIP.
    #[serde(default = "default_max_zip_members")]
    pub max_zip_members: usize,
    /// Maximum total extracted size accepted when unarchiving a ZIP.
    #[serde(default = "default_max_zip_extracted")]
    pub max_zip_extracted_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_path: default_root_path(),
            digits_per_level: default_digits_per_level(),
            base_url: default_base_url(),
            download_route: default_download_route(),
            max_upload_size_bytes: default_max_upload(),
            max_zip_members: default_max_zip_members(),
            max_zip_extracted_bytes: default_max_zip_extracted(),
        }
    }
}

fn default_root_path() -> String {
    "data/files".to_string()
}

fn default_digits_per_level() -> u32 {
    4
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_download_route() -> String {
    "foldershare/download".to_string()
}

fn default_max_upload() -> u64 {
    1024 * 1024 * 1024
}

fn default_max_zip_members() -> usize {
    10_000
}

fn default_max_zip_extracted() -> u64 {
    10 * 1024 * 1024 * 1024
}
