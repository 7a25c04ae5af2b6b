//! SQLite backend for the Lobby visit store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Lifecycle transitions run as
//! IMMEDIATE transactions on that single writer connection, which serialises
//! every read-validate-write sequence.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
