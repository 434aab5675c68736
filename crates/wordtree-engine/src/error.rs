//! Engine error taxonomy.
//!
//! Every engine operation fails with exactly one of three kinds:
//! [`EngineError::NotFound`], [`EngineError::InvalidOperation`] or
//! [`EngineError::StoreFailure`]. None of them is retried by the engine; the
//! enclosing transaction has already been rolled back when the caller sees one.

use wordtree_core::{CoreError, NodeId};
use wordtree_storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A referenced node, edge or parent does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request is structurally disallowed.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// The backing store failed; nothing was committed.
    #[error("store failure: {0}")]
    StoreFailure(#[source] StorageError),
}

impl EngineError {
    pub(crate) fn no_such_node(id: NodeId) -> Self {
        EngineError::NotFound(format!("no such menu item: {}", id))
    }

    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::NotFound(_) => "NOT_FOUND",
            EngineError::InvalidOperation(_) => "INVALID_OPERATION",
            EngineError::StoreFailure(_) => "STORE_FAILURE",
        }
    }
}

impl From<StorageError> for EngineError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NodeNotFound(id) => EngineError::no_such_node(id),
            StorageError::EdgeNotFound(id) => {
                EngineError::NotFound(format!("menu item {} has no parent", id))
            }
            other => EngineError::StoreFailure(other),
        }
    }
}

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        EngineError::InvalidOperation(err.to_string())
    }
}
