//! Per-user usage counters.
//!
//! Counters are maintained by delta on every create/delete/owner-change so
//! display stays cheap; a full recompute sweep exists for reconciliation
//! and must agree with the incrementally maintained values.

use serde::{Deserialize, Serialize};

use foldershare_core::types::UserId;

/// Additive usage counters for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUsage {
    /// The user these counters belong to.
    pub user_id: UserId,
    /// Number of root folders owned.
    pub n_root_folders: i64,
    /// Number of folders owned (root folders included).
    pub n_folders: i64,
    /// Number of files owned.
    pub n_files: i64,
    /// Total bytes of owned file content.
    pub n_bytes: i64,
}

impl UserUsage {
    /// Zeroed counters for a user.
    pub fn zero(user_id: UserId) -> Self {
        Self {
            user_id,
            n_root_folders: 0,
            n_folders: 0,
            n_files: 0,
            n_bytes: 0,
        }
    }

    /// Apply a delta in place.
    pub fn apply(&mut self, delta: &UsageDelta) {
        self.n_root_folders += delta.root_folders;
        self.n_folders += delta.folders;
        self.n_files += delta.files;
        self.n_bytes += delta.bytes;
    }

    /// Whether every counter is zero.
    pub fn is_zero(&self) -> bool {
        self.n_root_folders == 0 && self.n_folders == 0 && self.n_files == 0 && self.n_bytes == 0
    }
}

/// A delta applied to a user's counters by one mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageDelta {
    /// Change in owned root folders.
    pub root_folders: i64,
    /// Change in owned folders.
    pub folders: i64,
    /// Change in owned files.
    pub files: i64,
    /// Change in owned bytes.
    pub bytes: i64,
}

impl UsageDelta {
    /// Delta for creating a folder; root folders also count as folders.
    pub fn folder_created(is_root: bool) -> Self {
        Self {
            root_folders: if is_root { 1 } else { 0 },
            folders: 1,
            ..Self::default()
        }
    }

    /// Delta for creating a file of the given size.
    pub fn file_created(size_bytes: i64) -> Self {
        Self {
            files: 1,
            bytes: size_bytes,
            ..Self::default()
        }
    }

    /// The opposite delta, used for deletions and the losing side of an
    /// ownership change.
    pub fn negated(&self) -> Self {
        Self {
            root_folders: -self.root_folders,
            folders: -self.folders,
            files: -self.files,
            bytes: -self.bytes,
        }
    }

    /// Whether this delta changes nothing.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}
