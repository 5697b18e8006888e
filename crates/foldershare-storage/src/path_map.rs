//! Maps stable numeric file identity to an on-disk layout and a download URL.
//!
//! The user-visible name and folder path of an entity play no part in where
//! its bytes live: the zero-padded 20-digit file id is split into
//! fixed-width digit groups, each group naming one directory level, with
//! the final group as the stored file's name. Renames and moves therefore
//! never touch stored files, and no directory ever holds more than
//! `10^digits_per_level` entries.
//!
//! The mapping is pure: the same id always produces the same path, and two
//! distinct ids can never collide because both expand to exactly 20 digits.

use foldershare_core::config::storage::StorageConfig;
use foldershare_core::error::AppError;
use foldershare_core::result::AppResult;
use foldershare_core::types::{FileId, ItemId};

/// Width of the zero-padded decimal id.
const ID_DIGITS: usize = 20;

/// Computes stored-file paths and download URLs.
#[derive(Debug, Clone)]
pub struct StoragePathMapper {
    digits_per_level: usize,
    base_url: String,
    download_route: String,
}

impl StoragePathMapper {
    /// Create a mapper from configuration.
    ///
    /// `digits_per_level` must be between 1 and [`ID_DIGITS`].
    pub fn new(config: &StorageConfig) -> AppResult<Self> {
        let digits = config.digits_per_level as usize;
        if digits == 0 || digits > ID_DIGITS {
            return Err(AppError::configuration(format!(
                "digits_per_level must be between 1 and {ID_DIGITS}, got {digits}"
            )));
        }
        Ok(Self {
            digits_per_level: digits,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            download_route: config
                .download_route
                .trim_matches('/')
                .to_string(),
        })
    }

    /// The storage-relative path for a stored file id.
    ///
    /// With the default width of 4, file id 1234567 maps to
    /// `0000/0000/0000/0123/4567`.
    pub fn object_path(&self, file_id: FileId) -> AppResult<String> {
        if file_id.0 < 0 {
            return Err(AppError::validation(format!(
                "File id {file_id} is not a valid stored-file identity"
            )));
        }
        let digits = format!("{:0width$}", file_id.0, width = ID_DIGITS);
        let mut groups = Vec::with_capacity(ID_DIGITS / self.digits_per_level + 1);
        let mut rest = digits.as_str();
        while !rest.is_empty() {
            let (head, tail) = rest.split_at(self.digits_per_level.min(rest.len()));
            groups.push(head);
            rest = tail;
        }
        Ok(groups.join("/"))
    }

    /// The external, access-controlled download URL for an entity.
    ///
    /// The URL funnels through the download handler, which re-checks
    /// access; the real storage path is never exposed.
    pub fn download_url(&self, item_id: ItemId) -> String {
        format!("{}/{}/{}", self.base_url, self.download_route, item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper(digits: u32) -> StoragePathMapper {
        let config = StorageConfig {
            digits_per_level: digits,
            ..StorageConfig::default()
        };
        StoragePathMapper::new(&config).unwrap()
    }

    #[test]
    fn test_object_path_default_width() {
        let m = mapper(4);
        assert_eq!(
            m.object_path(FileId(1_234_567)).unwrap(),
            "0000/0000/0000/0123/4567"
        );
        assert_eq!(m.object_path(FileId(0)).unwrap(), "0000/0000/0000/0000/0000");
    }

    #[test]
    fn test_object_path_uneven_width() {
        // 20 digits in groups of 3: the last group carries the remainder.
        let m = mapper(3);
        let path = m.object_path(FileId(42)).unwrap();
        assert_eq!(path, "000/000/000/000/000/000/42");
    }

    #[test]
    fn test_object_path_deterministic() {
        let m = mapper(4);
        let a = m.object_path(FileId(981)).unwrap();
        let b = m.object_path(FileId(981)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinct_ids_never_collide() {
        let m = mapper(4);
        let mut seen = std::collections::HashSet::new();
        for id in (0..5000).chain([i64::MAX - 1, i64::MAX]) {
            assert!(seen.insert(m.object_path(FileId(id)).unwrap()));
        }
    }

    #[test]
    fn test_negative_id_rejected() {
        assert!(mapper(4).object_path(FileId(-1)).is_err());
    }

    #[test]
    fn test_bad_width_rejected() {
        let config = StorageConfig {
            digits_per_level: 0,
            ..StorageConfig::default()
        };
        assert!(StoragePathMapper::new(&config).is_err());
        let config = StorageConfig {
            digits_per_level: 21,
            ..StorageConfig::default()
        };
        assert!(StoragePathMapper::new(&config).is_err());
    }

    #[test]
    fn test_download_url() {
        let config = StorageConfig {
            base_url: "https://files.example.com/".into(),
            download_route: "/foldershare/download/".into(),
            ..StorageConfig::default()
        };
        let m = StoragePathMapper::new(&config).unwrap();
        assert_eq!(
            m.download_url(ItemId(17)),
            "https://files.example.com/foldershare/download/17"
        );
    }
}
