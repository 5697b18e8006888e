//! # foldershare-engine
//!
//! The entity tree engine: create/rename/move/copy/delete/archive
//! operations over the folder tree, with advisory locking, usage
//! accounting, scheme-path resolution, and synchronous observers.
//!
//! The engine enforces structural invariants only. Permission checks are
//! the caller's job (run the `foldershare-access` evaluator first); this
//! separation lets the REST adapter, archive extraction, and tests share
//! one engine behind one access policy.

pub mod archive;
pub mod engine;
pub mod lock;
pub mod report;
pub mod resolver;
pub mod tree;
pub mod usage;

pub use engine::TreeEngine;
pub use lock::{LockCoordinator, LockGuard};
pub use report::BulkReport;
pub use resolver::ResolvedPath;
