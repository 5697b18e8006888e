//! # foldershare-access
//!
//! The access-control evaluator: a pure decision function layering role
//! permissions, ownership, and per-root sharing grants, plus the two-tier
//! field-level policy applied when listing or editing entity fields.
//!
//! The evaluator decides; it never mutates. The tree engine assumes its
//! callers have already run the evaluator for the operation at hand.

pub mod actor;
pub mod evaluator;
pub mod fields;

pub use actor::{Actor, StaticUserDirectory};
pub use evaluator::{decide, AccessOp, Decision, DecisionSource};
