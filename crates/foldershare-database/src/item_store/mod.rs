//! Entity store backends.

pub mod memory;
pub mod postgres;
