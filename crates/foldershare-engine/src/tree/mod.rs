//! Tree mutation operations, one family per file.
//!
//! Every operation here assumes the caller has already run the access
//! evaluator; the engine enforces structural and locking invariants only.

mod copy;
mod create;
mod delete;
mod fields;
mod grants;
mod move_ops;
mod owner;
mod rename;
mod size;

pub use create::kind_for_name;
