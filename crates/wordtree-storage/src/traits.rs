//! The [`MenuStore`] trait defining the storage contract for menu trees.
//!
//! The contract has three groups of methods:
//! - **Node store**: CRUD over `(id, name, payload)` records.
//! - **Edge store**: CRUD over `child -> (parent, ordinal)` records, plus the
//!   ordered child query the tree reader recurses on.
//! - **Transaction control**: `begin`/`commit`/`rollback`. The engine wraps
//!   every multi-step mutation in one transaction; single calls made outside
//!   a transaction are individually atomic.
//!
//! All backends (InMemoryStore, SqliteStore) implement this trait with
//! identical semantics, so they are swappable under the engine.

use wordtree_core::{ChildRef, Edge, Node, NodeId};

use crate::error::StorageError;

/// The storage contract for menu trees.
///
/// The trait is synchronous: every call runs to completion on the calling
/// thread and blocks on the backend.
pub trait MenuStore {
    // -------------------------------------------------------------------
    // Transaction control
    // -------------------------------------------------------------------

    /// Opens a transaction. Fails if one is already open.
    fn begin(&mut self) -> Result<(), StorageError>;

    /// Commits the open transaction.
    fn commit(&mut self) -> Result<(), StorageError>;

    /// Discards every write made since [`MenuStore::begin`].
    fn rollback(&mut self) -> Result<(), StorageError>;

    /// Returns `true` while a transaction is open.
    fn in_transaction(&self) -> bool;

    // -------------------------------------------------------------------
    // Node store
    // -------------------------------------------------------------------

    /// Inserts a node with a freshly allocated id and returns that id.
    fn insert_node(&mut self, name: &str, payload: &str) -> Result<NodeId, StorageError>;

    /// Inserts a node under a caller-chosen id (used for the well-known root).
    ///
    /// Fails with [`StorageError::IntegrityError`] if the id is taken.
    fn insert_node_with_id(
        &mut self,
        id: NodeId,
        name: &str,
        payload: &str,
    ) -> Result<(), StorageError>;

    /// Retrieves a node by id.
    fn get_node(&self, id: NodeId) -> Result<Node, StorageError>;

    /// Returns `true` if a node with the given id exists.
    fn node_exists(&self, id: NodeId) -> Result<bool, StorageError>;

    /// Replaces a node's name.
    fn rename_node(&mut self, id: NodeId, name: &str) -> Result<(), StorageError>;

    /// Replaces a node's payload.
    fn set_payload(&mut self, id: NodeId, payload: &str) -> Result<(), StorageError>;

    /// Deletes a node. Its parent edge and child edges must already be gone.
    fn delete_node(&mut self, id: NodeId) -> Result<(), StorageError>;

    /// Total number of stored nodes.
    fn count_nodes(&self) -> Result<u64, StorageError>;

    // -------------------------------------------------------------------
    // Edge store
    // -------------------------------------------------------------------

    /// Inserts a parent edge.
    ///
    /// Fails with [`StorageError::IntegrityError`] if the child already has a
    /// parent, and with [`StorageError::NodeNotFound`] if either end is missing.
    fn insert_edge(&mut self, edge: &Edge) -> Result<(), StorageError>;

    /// Retrieves the parent edge of `child`.
    fn get_edge(&self, child: NodeId) -> Result<Edge, StorageError>;

    /// Retrieves the parent edge of `child`, if it has one.
    fn find_edge(&self, child: NodeId) -> Result<Option<Edge>, StorageError>;

    /// Rewrites the parent and ordinal of an existing edge in place.
    fn update_edge(&mut self, edge: &Edge) -> Result<(), StorageError>;

    /// Sets the ordinal of `child`'s edge.
    fn set_ordinal(&mut self, child: NodeId, ordinal: u32) -> Result<(), StorageError>;

    /// Deletes the parent edge of `child`.
    fn delete_edge(&mut self, child: NodeId) -> Result<(), StorageError>;

    /// Decrements by one the ordinal of every child of `parent` ranked above
    /// `ordinal`. Returns the number of edges changed.
    fn close_ordinal_gap(&mut self, parent: NodeId, ordinal: u32) -> Result<usize, StorageError>;

    /// Total number of stored edges.
    fn count_edges(&self) -> Result<u64, StorageError>;

    // -------------------------------------------------------------------
    // Query methods
    // -------------------------------------------------------------------

    /// Lists the children of `parent` joined with their nodes, ordered by
    /// ordinal ascending, then child id ascending.
    ///
    /// Does not check that `parent` exists: an unknown parent has no children.
    fn child_refs(&self, parent: NodeId) -> Result<Vec<ChildRef>, StorageError>;

    /// Number of children of `parent`.
    fn count_children(&self, parent: NodeId) -> Result<u32, StorageError>;
}
