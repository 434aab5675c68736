//! The ordered menu tree engine.
//!
//! [`MenuEngine`] owns a [`MenuStore`] and exposes the tree operations in
//! three groups, each in its own module:
//!
//! - [`reader`]: child enumeration, ancestor chains, depth-first descent and
//!   subtree materialization.
//! - [`ordinal`]: lazy rank assignment, single-step swaps and renumbering.
//! - [`mutation`]: add, rename, delete-subtree and reparent.
//!
//! [`bootstrap`] creates the well-known root on first access and resolves
//! slash-delimited paths; [`report`] summarizes the whole tree.
//!
//! Every mutating operation runs inside [`MenuEngine::atomically`]: one store
//! transaction that commits on success and rolls back on any error, so a
//! reader never observes a half-renumbered sibling set or a dangling edge.
//! Operations called from inside another operation's transaction join it.
//!
//! # Example
//!
//! ```
//! use wordtree_engine::MenuEngine;
//! use wordtree_storage::InMemoryStore;
//!
//! let mut engine = MenuEngine::new(InMemoryStore::new());
//! let root = engine.ensure_root().unwrap();
//! let soups = engine.add_child(root.id, "Soups").unwrap();
//! let children = engine.children(root.id).unwrap();
//! assert_eq!(children[0].id, soups.id);
//! assert_eq!(children[0].ordinal, 1);
//! ```

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod mutation;
pub mod ordinal;
pub mod reader;
pub mod report;

use wordtree_core::NodeId;
use wordtree_storage::MenuStore;

pub use config::EngineConfig;
pub use error::EngineError;
pub use ordinal::Direction;
pub use report::TreeReport;

/// The menu tree engine over a single backing store.
pub struct MenuEngine<S> {
    store: S,
    config: EngineConfig,
}

impl<S: MenuStore> MenuEngine<S> {
    /// Wraps `store` with the default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    pub fn with_config(store: S, config: EngineConfig) -> Self {
        MenuEngine { store, config }
    }

    /// Read access to the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Releases the backing store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Runs `f` inside one store transaction.
    ///
    /// Commits if `f` returns `Ok`, rolls back otherwise. If a transaction is
    /// already open, `f` joins it and the outermost caller decides the outcome.
    pub fn atomically<T, F>(&mut self, op: &'static str, f: F) -> Result<T, EngineError>
    where
        F: FnOnce(&mut Self) -> Result<T, EngineError>,
    {
        if self.store.in_transaction() {
            return f(self);
        }

        self.store.begin()?;
        match f(self) {
            Ok(value) => match self.store.commit() {
                Ok(()) => Ok(value),
                Err(err) => {
                    tracing::warn!(op, error = %err, "commit failed");
                    self.abort(op);
                    Err(err.into())
                }
            },
            Err(err) => {
                tracing::warn!(op, error = %err, "rolling back");
                self.abort(op);
                Err(err)
            }
        }
    }

    fn abort(&mut self, op: &'static str) {
        if let Err(err) = self.store.rollback() {
            tracing::warn!(op, error = %err, "rollback failed");
        }
    }

    /// Fails with `NotFound` unless `id` references a stored node.
    pub(crate) fn require_node(&self, id: NodeId) -> Result<(), EngineError> {
        if !id.is_valid() || !self.store.node_exists(id)? {
            return Err(EngineError::no_such_node(id));
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use wordtree_core::NodeId;
    use wordtree_storage::{InMemoryStore, MenuStore, StorageError};

    use super::*;

    #[test]
    fn atomically_rolls_back_on_error() {
        let mut engine = testing::engine();
        let result: Result<(), EngineError> = engine.atomically("test", |e| {
            e.store.insert_node("orphan", "")?;
            Err(EngineError::InvalidOperation("stop".into()))
        });
        assert!(result.is_err());
        assert_eq!(engine.store().count_nodes().unwrap(), 1);
        assert!(!engine.store().in_transaction());
    }

    #[test]
    fn nested_atomically_joins_outer_transaction() {
        let mut engine = testing::engine();
        let result: Result<(), EngineError> = engine.atomically("outer", |e| {
            e.atomically("inner", |inner| {
                inner.store.insert_node("kept until outer fails", "")?;
                Ok(())
            })?;
            assert!(e.store.in_transaction());
            Err(StorageError::IntegrityError {
                reason: "late failure".into(),
            }
            .into())
        });
        assert!(matches!(result, Err(EngineError::StoreFailure(_))));
        assert_eq!(engine.store().count_nodes().unwrap(), 1);
    }

    #[test]
    fn require_node_rejects_ids_below_minimum() {
        let engine = MenuEngine::new(InMemoryStore::new());
        assert!(matches!(
            engine.require_node(NodeId(0)),
            Err(EngineError::NotFound(_))
        ));
    }
}
