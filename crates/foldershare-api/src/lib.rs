//! # foldershare-api
//!
//! HTTP protocol adapter for FolderShare built on Axum.
//!
//! This crate is a thin translation layer: it maps requests onto the
//! access evaluator and the entity tree engine, and maps `AppError`
//! kinds onto HTTP status codes. No tree semantics live here.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod observer;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use state::ApiState;
