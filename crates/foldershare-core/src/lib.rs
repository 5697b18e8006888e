//! # foldershare-core
//!
//! Core crate for FolderShare. Contains typed identifiers, configuration
//! schemas, collaborator traits, tree events, and the unified error system.
//!
//! This crate has **no** internal dependencies on other FolderShare crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
