//! Collaborator traits defined at the core boundary.
//!
//! Traits live here in `foldershare-core` and are implemented in the leaf
//! crates (`foldershare-storage`, `foldershare-access`) or by test doubles.

pub mod identity;
pub mod storage;

pub use identity::UserDirectory;
pub use storage::{ByteStream, FileStorage, StoredFileMeta};
