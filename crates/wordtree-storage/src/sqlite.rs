//! SQLite implementation of [`MenuStore`].
//!
//! [`SqliteStore`] persists the node and edge tables in a SQLite database
//! with WAL mode, enforced foreign keys, and automatic schema migrations.
//! Transactions are opened with `BEGIN IMMEDIATE` so that a read-then-write
//! sequence inside one (counting siblings, then inserting at the end) holds
//! the write lock for its whole duration.

use rusqlite::{params, Connection, OptionalExtension};

use wordtree_core::{ChildRef, Edge, Node, NodeId};

use crate::error::StorageError;
use crate::traits::MenuStore;

/// SQLite-backed implementation of [`MenuStore`].
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) a SQLite database at `path`.
    pub fn new(path: &str) -> Result<Self, StorageError> {
        let conn = crate::schema::open_database(path)?;
        Ok(SqliteStore { conn })
    }

    /// Opens a private in-memory SQLite database (for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = crate::schema::open_in_memory()?;
        Ok(SqliteStore { conn })
    }

    /// The underlying connection, for ad-hoc queries and diagnostics.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn assert_node_exists(&self, id: NodeId) -> Result<(), StorageError> {
        if !self.node_exists(id)? {
            return Err(StorageError::NodeNotFound(id));
        }
        Ok(())
    }

    fn is_referenced_by_edge(&self, id: NodeId) -> Result<bool, StorageError> {
        let referenced: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM menu_edges WHERE child_id = ?1 OR parent_id = ?1)",
            params![id.0],
            |row| row.get(0),
        )?;
        Ok(referenced)
    }
}

impl MenuStore for SqliteStore {
    // -------------------------------------------------------------------
    // Transaction control
    // -------------------------------------------------------------------

    fn begin(&mut self) -> Result<(), StorageError> {
        if !self.conn.is_autocommit() {
            return Err(StorageError::Transaction {
                reason: "a transaction is already open".to_string(),
            });
        }
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        tracing::trace!("sqlite transaction opened");
        Ok(())
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        if self.conn.is_autocommit() {
            return Err(StorageError::Transaction {
                reason: "commit without an open transaction".to_string(),
            });
        }
        self.conn.execute_batch("COMMIT")?;
        tracing::trace!("sqlite transaction committed");
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), StorageError> {
        // SQLite rolls back on its own after some errors; nothing left to undo.
        if self.conn.is_autocommit() {
            tracing::debug!("rollback requested with no open sqlite transaction");
            return Ok(());
        }
        self.conn.execute_batch("ROLLBACK")?;
        tracing::trace!("sqlite transaction rolled back");
        Ok(())
    }

    fn in_transaction(&self) -> bool {
        !self.conn.is_autocommit()
    }

    // -------------------------------------------------------------------
    // Node store
    // -------------------------------------------------------------------

    fn insert_node(&mut self, name: &str, payload: &str) -> Result<NodeId, StorageError> {
        self.conn.execute(
            "INSERT INTO menu_nodes (name, payload) VALUES (?1, ?2)",
            params![name, payload],
        )?;
        Ok(NodeId(self.conn.last_insert_rowid()))
    }

    fn insert_node_with_id(
        &mut self,
        id: NodeId,
        name: &str,
        payload: &str,
    ) -> Result<(), StorageError> {
        if self.node_exists(id)? {
            return Err(StorageError::IntegrityError {
                reason: format!("node id {} is already in use", id),
            });
        }
        self.conn.execute(
            "INSERT INTO menu_nodes (id, name, payload) VALUES (?1, ?2, ?3)",
            params![id.0, name, payload],
        )?;
        Ok(())
    }

    fn get_node(&self, id: NodeId) -> Result<Node, StorageError> {
        let row = self
            .conn
            .query_row(
                "SELECT name, payload FROM menu_nodes WHERE id = ?1",
                params![id.0],
                |row| {
                    let name: String = row.get(0)?;
                    let payload: String = row.get(1)?;
                    Ok((name, payload))
                },
            )
            .optional()?;

        match row {
            Some((name, payload)) => Ok(Node { id, name, payload }),
            None => Err(StorageError::NodeNotFound(id)),
        }
    }

    fn node_exists(&self, id: NodeId) -> Result<bool, StorageError> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM menu_nodes WHERE id = ?1)",
            params![id.0],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn rename_node(&mut self, id: NodeId, name: &str) -> Result<(), StorageError> {
        let rows = self.conn.execute(
            "UPDATE menu_nodes SET name = ?2 WHERE id = ?1",
            params![id.0, name],
        )?;
        if rows == 0 {
            return Err(StorageError::NodeNotFound(id));
        }
        Ok(())
    }

    fn set_payload(&mut self, id: NodeId, payload: &str) -> Result<(), StorageError> {
        let rows = self.conn.execute(
            "UPDATE menu_nodes SET payload = ?2 WHERE id = ?1",
            params![id.0, payload],
        )?;
        if rows == 0 {
            return Err(StorageError::NodeNotFound(id));
        }
        Ok(())
    }

    fn delete_node(&mut self, id: NodeId) -> Result<(), StorageError> {
        if self.is_referenced_by_edge(id)? {
            return Err(StorageError::IntegrityError {
                reason: format!("node {} is still attached to the tree", id),
            });
        }
        let rows = self
            .conn
            .execute("DELETE FROM menu_nodes WHERE id = ?1", params![id.0])?;
        if rows == 0 {
            return Err(StorageError::NodeNotFound(id));
        }
        Ok(())
    }

    fn count_nodes(&self) -> Result<u64, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM menu_nodes", [], |row| row.get(0))?;
        Ok(count as u64)
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
        if self.find_edge(edge.child)?.is_some() {
            return Err(StorageError::IntegrityError {
                reason: format!("node {} already has a parent", edge.child),
            });
        }
        self.conn.execute(
            "INSERT INTO menu_edges (child_id, parent_id, ordinal) VALUES (?1, ?2, ?3)",
            params![edge.child.0, edge.parent.0, edge.ordinal],
        )?;
        Ok(())
    }

    fn get_edge(&self, child: NodeId) -> Result<Edge, StorageError> {
        self.find_edge(child)?
            .ok_or(StorageError::EdgeNotFound(child))
    }

    fn find_edge(&self, child: NodeId) -> Result<Option<Edge>, StorageError> {
        let row = self
            .conn
            .query_row(
                "SELECT parent_id, ordinal FROM menu_edges WHERE child_id = ?1",
                params![child.0],
                |row| {
                    let parent: i64 = row.get(0)?;
                    let ordinal: u32 = row.get(1)?;
                    Ok((parent, ordinal))
                },
            )
            .optional()?;
        Ok(row.map(|(parent, ordinal)| Edge::new(child, NodeId(parent), ordinal)))
    }

    fn update_edge(&mut self, edge: &Edge) -> Result<(), StorageError> {
        if edge.child == edge.parent {
            return Err(StorageError::IntegrityError {
                reason: format!("node {} cannot be its own parent", edge.child),
            });
        }
        self.assert_node_exists(edge.parent)?;
        let rows = self.conn.execute(
            "UPDATE menu_edges SET parent_id = ?2, ordinal = ?3 WHERE child_id = ?1",
            params![edge.child.0, edge.parent.0, edge.ordinal],
        )?;
        if rows == 0 {
            return Err(StorageError::EdgeNotFound(edge.child));
        }
        Ok(())
    }

    fn set_ordinal(&mut self, child: NodeId, ordinal: u32) -> Result<(), StorageError> {
        let rows = self.conn.execute(
            "UPDATE menu_edges SET ordinal = ?2 WHERE child_id = ?1",
            params![child.0, ordinal],
        )?;
        if rows == 0 {
            return Err(StorageError::EdgeNotFound(child));
        }
        Ok(())
    }

    fn delete_edge(&mut self, child: NodeId) -> Result<(), StorageError> {
        let rows = self
            .conn
            .execute("DELETE FROM menu_edges WHERE child_id = ?1", params![child.0])?;
        if rows == 0 {
            return Err(StorageError::EdgeNotFound(child));
        }
        Ok(())
    }

    fn close_ordinal_gap(&mut self, parent: NodeId, ordinal: u32) -> Result<usize, StorageError> {
        let rows = self.conn.execute(
            "UPDATE menu_edges SET ordinal = ordinal - 1 WHERE parent_id = ?1 AND ordinal > ?2",
            params![parent.0, ordinal],
        )?;
        Ok(rows)
    }

    fn count_edges(&self) -> Result<u64, StorageError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM menu_edges", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // -------------------------------------------------------------------
    // Query methods
    // -------------------------------------------------------------------

    fn child_refs(&self, parent: NodeId) -> Result<Vec<ChildRef>, StorageError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT e.child_id, n.name, n.payload, e.ordinal
             FROM menu_edges e
             JOIN menu_nodes n ON n.id = e.child_id
             WHERE e.parent_id = ?1
             ORDER BY e.ordinal, e.child_id",
        )?;
        let rows = stmt.query_map(params![parent.0], |row| {
            let child_id: i64 = row.get(0)?;
            let name: String = row.get(1)?;
            let payload: String = row.get(2)?;
            let ordinal: u32 = row.get(3)?;
            Ok(ChildRef {
                id: NodeId(child_id),
                parent_id: parent,
                name,
                payload,
                ordinal,
            })
        })?;
        let mut result = Vec::new();
        for row in rows {
            result.push(row?);
        }
        Ok(result)
    }

    fn count_children(&self, parent: NodeId) -> Result<u32, StorageError> {
        let count: u32 = self.conn.query_row(
            "SELECT COUNT(*) FROM menu_edges WHERE parent_id = ?1",
            params![parent.0],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_root() -> SqliteStore {
        let mut store = SqliteStore::in_memory().unwrap();
        store
            .insert_node_with_id(NodeId::ROOT, "Menu", "")
            .unwrap();
        store
    }

    fn add(store: &mut SqliteStore, parent: NodeId, name: &str, ordinal: u32) -> NodeId {
        let id = store.insert_node(name, "").unwrap();
        store.insert_edge(&Edge::new(id, parent, ordinal)).unwrap();
        id
    }

    #[test]
    fn node_crud() {
        let mut store = store_with_root();
        let id = store.insert_node("Soups", "hot").unwrap();
        assert!(id > NodeId::ROOT);

        let node = store.get_node(id).unwrap();
        assert_eq!(node.name, "Soups");
        assert_eq!(node.payload, "hot");

        store.rename_node(id, "Broths").unwrap();
        store.set_payload(id, "warm").unwrap();
        let node = store.get_node(id).unwrap();
        assert_eq!((node.name.as_str(), node.payload.as_str()), ("Broths", "warm"));

        store.delete_node(id).unwrap();
        assert!(matches!(
            store.get_node(id),
            Err(StorageError::NodeNotFound(n)) if n == id
        ));
        assert!(matches!(
            store.rename_node(id, "x"),
            Err(StorageError::NodeNotFound(_))
        ));
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut store = store_with_root();
        let first = store.insert_node("a", "").unwrap();
        store.delete_node(first).unwrap();
        let second = store.insert_node("b", "").unwrap();
        assert!(second > first);
    }

    #[test]
    fn root_id_cannot_be_inserted_twice() {
        let mut store = store_with_root();
        let err = store
            .insert_node_with_id(NodeId::ROOT, "Other", "")
            .unwrap_err();
        assert!(matches!(err, StorageError::IntegrityError { .. }));
    }

    #[test]
    fn a_node_has_at_most_one_parent() {
        let mut store = store_with_root();
        let a = add(&mut store, NodeId::ROOT, "A", 1);
        let b = add(&mut store, NodeId::ROOT, "B", 2);

        let err = store.insert_edge(&Edge::new(b, a, 1)).unwrap_err();
        assert!(matches!(err, StorageError::IntegrityError { .. }));
        assert_eq!(store.get_edge(b).unwrap().parent, NodeId::ROOT);
    }

    #[test]
    fn edge_to_missing_parent_is_not_found() {
        let mut store = store_with_root();
        let a = store.insert_node("A", "").unwrap();
        let err = store.insert_edge(&Edge::new(a, NodeId(999), 1)).unwrap_err();
        assert!(matches!(err, StorageError::NodeNotFound(NodeId(999))));
    }

    #[test]
    fn attached_node_cannot_be_deleted() {
        let mut store = store_with_root();
        let a = add(&mut store, NodeId::ROOT, "A", 1);
        let err = store.delete_node(a).unwrap_err();
        assert!(matches!(err, StorageError::IntegrityError { .. }));

        store.delete_edge(a).unwrap();
        store.delete_node(a).unwrap();
        assert_eq!(store.count_nodes().unwrap(), 1);
    }

    #[test]
    fn child_refs_order_by_ordinal_then_id() {
        let mut store = store_with_root();
        let a = add(&mut store, NodeId::ROOT, "A", 2);
        let b = add(&mut store, NodeId::ROOT, "B", 1);
        let c = add(&mut store, NodeId::ROOT, "C", 2);

        let ids: Vec<NodeId> = store
            .child_refs(NodeId::ROOT)
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![b, a, c]);
        assert_eq!(store.count_children(NodeId::ROOT).unwrap(), 3);
        assert!(store.child_refs(NodeId(4242)).unwrap().is_empty());
    }

    #[test]
    fn close_ordinal_gap_only_touches_higher_siblings() {
        let mut store = store_with_root();
        let a = add(&mut store, NodeId::ROOT, "A", 1);
        let b = add(&mut store, NodeId::ROOT, "B", 2);
        let c = add(&mut store, NodeId::ROOT, "C", 3);
        let nested = add(&mut store, a, "A1", 5);

        store.delete_edge(b).unwrap();
        assert_eq!(store.close_ordinal_gap(NodeId::ROOT, 2).unwrap(), 1);

        assert_eq!(store.get_edge(a).unwrap().ordinal, 1);
        assert_eq!(store.get_edge(c).unwrap().ordinal, 2);
        assert_eq!(store.get_edge(nested).unwrap().ordinal, 5);
    }

    #[test]
    fn update_edge_moves_child() {
        let mut store = store_with_root();
        let a = add(&mut store, NodeId::ROOT, "A", 1);
        let b = add(&mut store, NodeId::ROOT, "B", 2);

        store.update_edge(&Edge::new(b, a, 1)).unwrap();
        assert_eq!(store.get_edge(b).unwrap(), Edge::new(b, a, 1));

        let err = store.update_edge(&Edge::new(a, a, 1)).unwrap_err();
        assert!(matches!(err, StorageError::IntegrityError { .. }));
        let err = store.set_ordinal(NodeId::ROOT, 3).unwrap_err();
        assert!(matches!(err, StorageError::EdgeNotFound(NodeId::ROOT)));
    }

    #[test]
    fn rollback_discards_writes() {
        let mut store = store_with_root();
        store.begin().unwrap();
        assert!(store.in_transaction());
        add(&mut store, NodeId::ROOT, "A", 1);
        store.rollback().unwrap();

        assert!(!store.in_transaction());
        assert_eq!(store.count_nodes().unwrap(), 1);
        assert_eq!(store.count_edges().unwrap(), 0);
    }

    #[test]
    fn commit_keeps_writes_and_rejects_nesting() {
        let mut store = store_with_root();
        store.begin().unwrap();
        assert!(matches!(
            store.begin(),
            Err(StorageError::Transaction { .. })
        ));
        add(&mut store, NodeId::ROOT, "A", 1);
        store.commit().unwrap();
        assert_eq!(store.count_edges().unwrap(), 1);

        assert!(matches!(
            store.commit(),
            Err(StorageError::Transaction { .. })
        ));
    }

    #[test]
    fn file_database_persists_between_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.db");
        let path = path.to_str().unwrap();

        {
            let mut store = SqliteStore::new(path).unwrap();
            store
                .insert_node_with_id(NodeId::ROOT, "Menu", "")
                .unwrap();
            add(&mut store, NodeId::ROOT, "A", 1);
        }

        let store = SqliteStore::new(path).unwrap();
        let children = store.child_refs(NodeId::ROOT).unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].name, "A");
    }
}
