//! SQLite backend for the Porter access ledger.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Live window subscriptions are fed from
//! the write path: every successful append re-reads the affected windows and
//! pushes fresh snapshots to their watchers.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;
