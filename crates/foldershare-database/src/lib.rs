//! # foldershare-database
//!
//! [`EntityStore`](foldershare_entity::EntityStore) implementations: a
//! PostgreSQL store built on sqlx, and a dashmap-backed in-memory store
//! used by tests and single-node development.

pub mod connection;
pub mod item_store;
pub mod migration;

pub use item_store::memory::MemoryEntityStore;
pub use item_store::postgres::PgEntityStore;
