//! Site-wide sharing policy configuration.

use serde::{Deserialize, Serialize};

/// Site-wide sharing policy.
///
/// When `sharing_enabled` is off, per-root grants are ignored and only
/// owners (and administrators) can reach content. `share` operations are
/// denied for everyone, including administrators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharingConfig {
    /// Whether sharing between users is enabled at all.
    #[serde(default = "default_true")]
    pub sharing_enabled: bool,
    /// Whether grants extend to anonymous (not logged in) users.
    #[serde(default)]
    pub anonymous_sharing_enabled: bool,
    /// Maximum length of an entity name in characters.
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
}

impl Default for SharingConfig {
    fn default() -> Self {
        Self {
            sharing_enabled: default_true(),
            anonymous_sharing_enabled: false,
            max_name_length: default_max_name_length(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_name_length() -> usize {
    255
}
