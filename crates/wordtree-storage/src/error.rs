//! Storage error types for wordtree-storage.
//!
//! [`StorageError`] covers every failure a backend can report: missing
//! records, integrity violations, transaction misuse, and the underlying
//! SQLite and migration errors.

use thiserror::Error;

use wordtree_core::NodeId;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// SQLite reported an error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// No node with the given id exists.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// The node has no parent edge.
    #[error("edge not found: node {0} has no parent edge")]
    EdgeNotFound(NodeId),

    /// A write would break a structural rule of the tables.
    #[error("integrity error: {reason}")]
    IntegrityError { reason: String },

    /// Transaction control was used out of order.
    #[error("transaction error: {reason}")]
    Transaction { reason: String },
}

impl StorageError {
    /// Returns `true` for the variants that mean "the referenced record does
    /// not exist".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StorageError::NodeNotFound(_) | StorageError::EdgeNotFound(_)
        )
    }
}
