//! # foldershare-storage
//!
//! The storage path mapper and the local filesystem implementation of the
//! [`FileStorage`](foldershare_core::traits::FileStorage) collaborator.

pub mod local;
pub mod path_map;

pub use local::LocalFileStorage;
pub use path_map::StoragePathMapper;
