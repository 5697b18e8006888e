//! The FolderShare entity: a node in the folder tree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use foldershare_core::types::{FileId, ItemId, UserId};

use crate::grants::AccessGrants;

/// The kind of a tree entity. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A generic file wrapping an underlying stored file.
    File,
    /// An image file.
    Image,
    /// An audio/video file.
    Media,
    /// A folder below a root folder.
    Folder,
    /// A top-level folder; sole holder of access grants.
    RootFolder,
}

impl ItemKind {
    /// Whether this kind can contain children.
    pub fn is_folder(&self) -> bool {
        matches!(self, Self::Folder | Self::RootFolder)
    }

    /// Whether this kind wraps an underlying stored file.
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File | Self::Image | Self::Media)
    }

    /// Stable string form used by the database and the API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Image => "image",
            Self::Media => "media",
            Self::Folder => "folder",
            Self::RootFolder => "root_folder",
        }
    }

    /// Parse the stable string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "file" => Some(Self::File),
            "image" => Some(Self::Image),
            "media" => Some(Self::Media),
            "folder" => Some(Self::Folder),
            "root_folder" => Some(Self::RootFolder),
            _ => None,
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A FolderShare entity: one node in the folder tree.
///
/// Root folders have `parent_id == None` and `root_id == id`, and are the
/// only entities carrying access grants. Folder sizes are computed lazily:
/// `size == None` means "not yet computed".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Unique entity identifier, immutable, assigned on creation.
    pub id: ItemId,
    /// Entity kind, immutable after creation.
    pub kind: ItemKind,
    /// Entity name, unique among siblings.
    pub name: String,
    /// Parent entity (None for root folders).
    pub parent_id: Option<ItemId>,
    /// The top-most ancestor; equals `id` for root folders.
    pub root_id: ItemId,
    /// The owning user.
    pub owner_id: UserId,
    /// Size in bytes; `None` for folders whose size has not been computed.
    pub size: Option<i64>,
    /// When the entity was created.
    pub created_at: DateTime<Utc>,
    /// When the entity was last changed.
    pub changed_at: DateTime<Utc>,
    /// Optional free-text description.
    pub description: String,
    /// Underlying stored file (None for folders).
    pub file_id: Option<FileId>,
    /// Access grants; present only on root folders.
    pub grants: Option<AccessGrants>,
    /// Extensible key-value bag for third-party fields.
    #[serde(default)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Item {
    /// Whether this entity is a root folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Whether this entity can contain children.
    pub fn is_folder(&self) -> bool {
        self.kind.is_folder()
    }

    /// Whether this entity wraps an underlying stored file.
    pub fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// The grants on this root folder, or empty grants for non-roots.
    ///
    /// Non-root entities have no grant storage; access is always resolved
    /// by walking to the root.
    pub fn grants_or_default(&self) -> AccessGrants {
        self.grants
            .clone()
            .unwrap_or_else(|| AccessGrants::new(self.owner_id))
    }
}

/// Data required to create a new entity. The store assigns the id and
/// timestamps; `root_id == None` means "this entity is its own root".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItem {
    /// Entity kind.
    pub kind: ItemKind,
    /// Entity name.
    pub name: String,
    /// Parent entity (None for root folders).
    pub parent_id: Option<ItemId>,
    /// Root ancestor; None for "self" (root folders).
    pub root_id: Option<ItemId>,
    /// The owning user.
    pub owner_id: UserId,
    /// Size in bytes, if known.
    pub size: Option<i64>,
    /// Optional description.
    pub description: String,
    /// Underlying stored file, for file kinds.
    pub file_id: Option<FileId>,
    /// Access grants; set for root folders only.
    pub grants: Option<AccessGrants>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_codec() {
        for kind in [
            ItemKind::File,
            ItemKind::Image,
            ItemKind::Media,
            ItemKind::Folder,
            ItemKind::RootFolder,
        ] {
            assert_eq!(ItemKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ItemKind::parse("directory"), None);
    }

    #[test]
    fn test_kind_predicates() {
        assert!(ItemKind::RootFolder.is_folder());
        assert!(ItemKind::Folder.is_folder());
        assert!(!ItemKind::Image.is_folder());
        assert!(ItemKind::Media.is_file());
        assert!(!ItemKind::Folder.is_file());
    }
}
