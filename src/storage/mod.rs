//! Storage layer abstraction.
//!
//! Each record kind has its own backend trait:
//! - **Groups**: the per-owner group forest ([`GroupBackend`])
//! - **Links**: bookmarks and their group associations ([`LinkBackend`])
//! - **Tags**: owner tags and their associations ([`TagBackend`])
//!
//! [`SqliteBackend`] implements all three on one connection.

// Allow significant_drop_tightening - dropping database connections slightly early
// provides no meaningful benefit.
#![allow(clippy::significant_drop_tightening)]
// Allow cast_possible_truncation for row counts returned by SQLite.
#![allow(clippy::cast_possible_truncation)]

pub mod group;
pub mod link;
pub mod sqlite;
pub mod tag;

pub use group::GroupBackend;
pub use link::LinkBackend;
pub use sqlite::SqliteBackend;
pub use tag::TagBackend;

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ShelfConfig;
use crate::{Error, Result};

/// Factory for creating the storage backend.
pub struct StorageFactory;

impl StorageFactory {
    /// Opens the database configured in `config`.
    ///
    /// Falls back to [`SqliteBackend::default_path`] when no path is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if no path can be determined or the database cannot
    /// be initialized.
    pub fn open(config: &ShelfConfig) -> Result<Arc<SqliteBackend>> {
        let path = config
            .database_path
            .clone()
            .or_else(SqliteBackend::default_path)
            .ok_or_else(|| Error::OperationFailed {
                operation: "open_storage".to_string(),
                cause: "Could not determine database path".to_string(),
            })?;
        Self::create_with_path(path)
    }

    /// Creates storage with an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn create_with_path(path: PathBuf) -> Result<Arc<SqliteBackend>> {
        tracing::debug!(path = %path.display(), "Opening storage");
        Ok(Arc::new(SqliteBackend::new(path)?))
    }

    /// Creates an in-memory storage (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn create_in_memory() -> Result<Arc<SqliteBackend>> {
        Ok(Arc::new(SqliteBackend::in_memory()?))
    }
}
