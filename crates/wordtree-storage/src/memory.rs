//! In-memory implementation of [`MenuStore`].
//!
//! [`InMemoryStore`] is a first-class backend for tests and ephemeral
//! sessions. It keeps both record sets in `BTreeMap`s with the same
//! semantics as the SQLite backend, including id allocation that never
//! reuses an id and snapshot-based rollback.

use std::collections::BTreeMap;

use wordtree_core::{ChildRef, Edge, Node, NodeId};

use crate::error::StorageError;
use crate::traits::MenuStore;

/// The full contents of the store; cloned on `begin` for rollback.
#[derive(Debug, Clone, Default)]
struct Tables {
    nodes: BTreeMap<NodeId, Node>,
    /// Parent edges keyed by child id.
    edges: BTreeMap<NodeId, Edge>,
    /// Highest id ever allocated.
    last_id: i64,
}

/// In-memory backend with the same semantics as [`crate::SqliteStore`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Tables,
    /// State as of `begin`, present while a transaction is open.
    snapshot: Option<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, StorageError> {
        self.tables
            .nodes
            .get_mut(&id)
            .ok_or(StorageError::NodeNotFound(id))
    }

    fn edge_mut(&mut self, child: NodeId) -> Result<&mut Edge, StorageError> {
        self.tables
            .edges
            .get_mut(&child)
            .ok_or(StorageError::EdgeNotFound(child))
    }

    fn assert_node_exists(&self, id: NodeId) -> Result<(), StorageError> {
        if !self.tables.nodes.contains_key(&id) {
            return Err(StorageError::NodeNotFound(id));
        }
        Ok(())
    }

    fn edges_from(&self, parent: NodeId) -> impl Iterator<Item = &Edge> {
        self.tables.edges.values().filter(move |e| e.parent == parent)
    }
}

impl MenuStore for InMemoryStore {
    // -------------------------------------------------------------------
    // Transaction control
    // -------------------------------------------------------------------

    fn begin(&mut self) -> Result<(), StorageError> {
        if self.snapshot.is_some() {
            return Err(StorageError::Transaction {
                reason: "a transaction is already open".to_string(),
            });
        }
        self.snapshot = Some(self.tables.clone());
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        match self.snapshot.take() {
            Some(_) => Ok(()),
            None => Err(StorageError::Transaction {
                reason: "commit without an open transaction".to_string(),
            }),
        }
    }

    fn rollback(&mut self) -> Result<(), StorageError> {
        if let Some(snapshot) = self.snapshot.take() {
            self.tables = snapshot;
        }
        Ok(())
    }

    fn in_transaction(&self) -> bool {
        self.snapshot.is_some()
    }

    // -------------------------------------------------------------------
    // Node store
    // -------------------------------------------------------------------

    fn insert_node(&mut self, name: &str, payload: &str) -> Result<NodeId, StorageError> {
        let id = NodeId(self.tables.last_id + 1);
        self.tables.last_id = id.0;
        self.tables.nodes.insert(
            id,
            Node {
                id,
                name: name.to_string(),
                payload: payload.to_string(),
            },
        );
        Ok(id)
    }

    fn insert_node_with_id(
        &mut self,
        id: NodeId,
        name: &str,
        payload: &str,
    ) -> Result<(), StorageError> {
        if self.tables.nodes.contains_key(&id) {
            return Err(StorageError::IntegrityError {
                reason: format!("node id {} is already in use", id),
            });
        }
        self.tables.last_id = self.tables.last_id.max(id.0);
        self.tables.nodes.insert(
            id,
            Node {
                id,
                name: name.to_string(),
                payload: payload.to_string(),
            },
        );
        Ok(())
    }

    fn get_node(&self, id: NodeId) -> Result<Node, StorageError> {
        self.tables
            .nodes
            .get(&id)
            .cloned()
            .ok_or(StorageError::NodeNotFound(id))
    }

    fn node_exists(&self, id: NodeId) -> Result<bool, StorageError> {
        Ok(self.tables.nodes.contains_key(&id))
    }

    fn rename_node(&mut self, id: NodeId, name: &str) -> Result<(), StorageError> {
        self.node_mut(id)?.name = name.to_string();
        Ok(())
    }

    fn set_payload(&mut self, id: NodeId, payload: &str) -> Result<(), StorageError> {
        self.node_mut(id)?.payload = payload.to_string();
        Ok(())
    }

    fn delete_node(&mut self, id: NodeId) -> Result<(), StorageError> {
        let attached = self.tables.edges.contains_key(&id) || self.edges_from(id).next().is_some();
        if attached {
            return Err(StorageError::IntegrityError {
                reason: format!("node {} is still attached to the tree", id),
            });
        }
        self.tables
            .nodes
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::NodeNotFound(id))
    }

    fn count_nodes(&self) -> Result<u64, StorageError> {
        Ok(self.tables.nodes.len() as u64)
    }

    // -------------------------------------------------------------------
    // Edge store
    // -------------------------------------------------------------------

    fn insert_edge(&mut self, edge: &Edge) -> Result<(), StorageError> {
        if edge.child == edge.parent {
            return Err(StorageError::IntegrityError {
                reason: format!("node {} cannot be its own parent", edge.child),
            });
        }
        self.assert_node_exists(edge.child)?;
        self.assert_node_exists(edge.parent)?;
        if self.tables.edges.contains_key(&edge.child) {
            return Err(StorageError::IntegrityError {
                reason: format!("node {} already has a parent", edge.child),
            });
        }
        self.tables.edges.insert(edge.child, *edge);
        Ok(())
    }

    fn get_edge(&self, child: NodeId) -> Result<Edge, StorageError> {
        self.tables
            .edges
            .get(&child)
            .copied()
            .ok_or(StorageError::EdgeNotFound(child))
    }

    fn find_edge(&self, child: NodeId) -> Result<Option<Edge>, StorageError> {
        Ok(self.tables.edges.get(&child).copied())
    }

    fn update_edge(&mut self, edge: &Edge) -> Result<(), StorageError> {
        if edge.child == edge.parent {
            return Err(StorageError::IntegrityError {
                reason: format!("node {} cannot be its own parent", edge.child),
            });
        }
        self.assert_node_exists(edge.parent)?;
        *self.edge_mut(edge.child)? = *edge;
        Ok(())
    }

    fn set_ordinal(&mut self, child: NodeId, ordinal: u32) -> Result<(), StorageError> {
        self.edge_mut(child)?.ordinal = ordinal;
        Ok(())
    }

    fn delete_edge(&mut self, child: NodeId) -> Result<(), StorageError> {
        self.tables
            .edges
            .remove(&child)
            .map(|_| ())
            .ok_or(StorageError::EdgeNotFound(child))
    }

    fn close_ordinal_gap(&mut self, parent: NodeId, ordinal: u32) -> Result<usize, StorageError> {
        let mut changed = 0;
        for edge in self.tables.edges.values_mut() {
            if edge.parent == parent && edge.ordinal > ordinal {
                edge.ordinal -= 1;
                changed += 1;
            }
        }
        Ok(changed)
    }

    fn count_edges(&self) -> Result<u64, StorageError> {
        Ok(self.tables.edges.len() as u64)
    }

    // -------------------------------------------------------------------
    // Query methods
    // -------------------------------------------------------------------

    fn child_refs(&self, parent: NodeId) -> Result<Vec<ChildRef>, StorageError> {
        let mut result = Vec::new();
        for edge in self.edges_from(parent) {
            let node = self.tables.nodes.get(&edge.child).ok_or_else(|| {
                StorageError::IntegrityError {
                    reason: format!("edge references missing node {}", edge.child),
                }
            })?;
            result.push(ChildRef {
                id: edge.child,
                parent_id: parent,
                name: node.name.clone(),
                payload: node.payload.clone(),
                ordinal: edge.ordinal,
            });
        }
        result.sort_by_key(|c| (c.ordinal, c.id));
        Ok(result)
    }

    fn count_children(&self, parent: NodeId) -> Result<u32, StorageError> {
        Ok(self.edges_from(parent).count() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_root() -> InMemoryStore {
        let mut store = InMemoryStore::new();
        store
            .insert_node_with_id(NodeId::ROOT, "Menu", "")
            .unwrap();
        store
    }

    fn add(store: &mut InMemoryStore, parent: NodeId, name: &str, ordinal: u32) -> NodeId {
        let id = store.insert_node(name, "").unwrap();
        store.insert_edge(&Edge::new(id, parent, ordinal)).unwrap();
        id
    }

    #[test]
    fn first_allocated_id_follows_root() {
        let mut store = store_with_root();
        assert_eq!(store.insert_node("A", "").unwrap(), NodeId(2));

        let mut empty = InMemoryStore::new();
        assert_eq!(empty.insert_node("A", "").unwrap(), NodeId::MIN);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut store = store_with_root();
        let a = store.insert_node("A", "").unwrap();
        store.delete_node(a).unwrap();
        assert!(store.insert_node("B", "").unwrap() > a);
    }

    #[test]
    fn child_refs_order_by_ordinal_then_id() {
        let mut store = store_with_root();
        let a = add(&mut store, NodeId::ROOT, "A", 0);
        let b = add(&mut store, NodeId::ROOT, "B", 0);
        let c = add(&mut store, NodeId::ROOT, "C", 1);

        let rows = store.child_refs(NodeId::ROOT).unwrap();
        let ids: Vec<NodeId> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a, b, c]);
        assert!(rows.iter().all(|r| r.parent_id == NodeId::ROOT));
    }

    #[test]
    fn one_parent_per_node() {
        let mut store = store_with_root();
        let a = add(&mut store, NodeId::ROOT, "A", 1);
        let b = add(&mut store, NodeId::ROOT, "B", 2);
        assert!(matches!(
            store.insert_edge(&Edge::new(a, b, 1)),
            Err(StorageError::IntegrityError { .. })
        ));
    }

    #[test]
    fn delete_node_requires_detached_node() {
        let mut store = store_with_root();
        let a = add(&mut store, NodeId::ROOT, "A", 1);
        let a1 = add(&mut store, a, "A1", 1);

        store.delete_edge(a).unwrap();
        // a is detached from its parent but still has a child.
        assert!(matches!(
            store.delete_node(a),
            Err(StorageError::IntegrityError { .. })
        ));
        store.delete_edge(a1).unwrap();
        store.delete_node(a1).unwrap();
        store.delete_node(a).unwrap();
        assert_eq!(store.count_nodes().unwrap(), 1);
    }

    #[test]
    fn rollback_restores_snapshot() {
        let mut store = store_with_root();
        let a = add(&mut store, NodeId::ROOT, "A", 1);

        store.begin().unwrap();
        store.rename_node(a, "Changed").unwrap();
        add(&mut store, a, "A1", 1);
        store.rollback().unwrap();

        assert_eq!(store.get_node(a).unwrap().name, "A");
        assert_eq!(store.count_children(a).unwrap(), 0);
        assert!(!store.in_transaction());
    }

    #[test]
    fn commit_without_begin_fails() {
        let mut store = store_with_root();
        assert!(matches!(
            store.commit(),
            Err(StorageError::Transaction { .. })
        ));
        store.begin().unwrap();
        assert!(store.begin().is_err());
        store.commit().unwrap();
    }

    #[test]
    fn close_ordinal_gap_scoped_to_parent() {
        let mut store = store_with_root();
        let a = add(&mut store, NodeId::ROOT, "A", 1);
        let b = add(&mut store, NodeId::ROOT, "B", 3);
        let a1 = add(&mut store, a, "A1", 3);

        assert_eq!(store.close_ordinal_gap(NodeId::ROOT, 2).unwrap(), 1);
        assert_eq!(store.get_edge(b).unwrap().ordinal, 2);
        assert_eq!(store.get_edge(a1).unwrap().ordinal, 3);
    }
}
