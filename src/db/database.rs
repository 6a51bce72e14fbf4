//! Database connection management
//!
//! This module provides Diesel-based connectivity to the file-backed SQLite
//! store. Each pipeline phase opens its own connection; dropping the
//! connection closes it.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::path::{Path, PathBuf};

use crate::error::{EcomError, Result};

pub type DbConnection = SqliteConnection;

/// Handle to the SQLite store file
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
    config: DatabaseConfig,
}

impl Database {
    /// Create a handle for the store at `path`
    ///
    /// # Example
    /// ```ignore
    /// let db = Database::new("ecom.db");
    /// let mut conn = db.connect()?;
    /// ```
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::new_with_config(path, DatabaseConfig::default())
    }

    /// Create a handle with custom configuration
    pub fn new_with_config(path: impl Into<PathBuf>, config: DatabaseConfig) -> Self {
        Database {
            path: path.into(),
            config,
        }
    }

    /// Open a read-write connection, creating the file if needed
    pub fn connect(&self) -> Result<DbConnection> {
        let url = self.path.to_str().ok_or_else(|| {
            EcomError::Config(format!(
                "Database path is not valid UTF-8: {}",
                self.path.display()
            ))
        })?;

        let mut conn = DbConnection::establish(url)?;
        conn.batch_execute(&format!("PRAGMA busy_timeout = {};", self.config.busy_timeout_ms))?;

        tracing::debug!(path = %self.path.display(), "Opened database connection");
        Ok(conn)
    }

    /// Open a connection that rejects every write
    pub fn connect_read_only(&self) -> Result<DbConnection> {
        let mut conn = self.connect()?;
        conn.batch_execute("PRAGMA query_only = ON;")?;
        Ok(conn)
    }

    /// Path of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Database configuration options
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            busy_timeout_ms: 5000, // Wait up to 5s on a locked file
        }
    }
}
