//! Mutation engine: add, rename, delete-subtree, reparent.
//!
//! Each operation is one transaction. A failure anywhere inside rolls back
//! everything the operation wrote; in particular a subtree is either deleted
//! whole, with its former siblings renumbered, or not at all.

use std::iter;

use wordtree_core::{validate_name, Depth, Edge, MenuPath, Node, NodeId, TraversalOrder};
use wordtree_storage::MenuStore;

use crate::error::EngineError;
use crate::MenuEngine;

impl<S: MenuStore> MenuEngine<S> {
    /// The edge attaching `node` to its parent.
    pub(crate) fn parent_edge(&self, node: NodeId) -> Result<Edge, EngineError> {
        self.require_node(node)?;
        Ok(self.store.get_edge(node)?)
    }

    /// Creates a node named `name` as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, name: &str) -> Result<Node, EngineError> {
        let name = validate_name(name)?;
        let (node, ordinal) = self.atomically("add_child", |engine| {
            engine.require_node(parent)?;
            let ordinal = engine.append_at_end(parent)?;
            let id = engine.store.insert_node(&name, "")?;
            engine.store.insert_edge(&Edge::new(id, parent, ordinal))?;
            Ok((
                Node {
                    id,
                    name,
                    payload: String::new(),
                },
                ordinal,
            ))
        })?;
        tracing::info!(node = %node.id, %parent, ordinal, name = %node.name, "added menu item");
        Ok(node)
    }

    /// Renames a node. The root may be renamed.
    pub fn rename_node(&mut self, id: NodeId, name: &str) -> Result<Node, EngineError> {
        let name = validate_name(name)?;
        let node = self.atomically("rename_node", |engine| {
            engine.require_node(id)?;
            engine.store.rename_node(id, &name)?;
            Ok(engine.store.get_node(id)?)
        })?;
        tracing::info!(node = %id, name = %node.name, "renamed menu item");
        Ok(node)
    }

    /// Replaces a node's free-text payload. The root may be edited.
    pub fn set_payload(&mut self, id: NodeId, payload: &str) -> Result<Node, EngineError> {
        let node = self.atomically("set_payload", |engine| {
            engine.require_node(id)?;
            engine.store.set_payload(id, payload)?;
            Ok(engine.store.get_node(id)?)
        })?;
        tracing::info!(node = %id, bytes = payload.len(), "updated menu item payload");
        Ok(node)
    }

    /// Deletes `id` and every node below it, then closes the gap among its
    /// former siblings.
    ///
    /// Nodes go in post-order with `id` last, each edge before its node.
    /// Returns the deleted ids in that order. The root is never deleted.
    pub fn delete_subtree(&mut self, id: NodeId) -> Result<Vec<NodeId>, EngineError> {
        if id.is_root() {
            return Err(EngineError::InvalidOperation(
                "the root menu cannot be deleted".to_string(),
            ));
        }

        let (removed, parent) = self.atomically("delete_subtree", |engine| {
            let parent = engine.parent_edge(id)?.parent;
            engine.ranked_children(parent)?;
            let edge = engine.store.get_edge(id)?;

            let removed: Vec<NodeId> = engine
                .descendants(id, TraversalOrder::Post, Depth::Unbounded)?
                .into_iter()
                .map(|c| c.id)
                .chain(iter::once(id))
                .collect();
            for victim in &removed {
                engine.store.delete_edge(*victim)?;
                engine.store.delete_node(*victim)?;
            }
            engine.renumber_after_removal(parent, edge.ordinal)?;
            Ok((removed, parent))
        })?;
        tracing::info!(node = %id, %parent, removed = removed.len(), "deleted menu subtree");
        Ok(removed)
    }

    /// Moves `id` (with its subtree) to be the last child of `new_parent`.
    ///
    /// Only `id`'s own edge changes; its former siblings are renumbered.
    /// Fails with `InvalidOperation` for the root, or when `new_parent` is
    /// `id` itself or one of its descendants. Returns the new path of `id`.
    pub fn reparent(&mut self, id: NodeId, new_parent: NodeId) -> Result<MenuPath, EngineError> {
        if id.is_root() {
            return Err(EngineError::InvalidOperation(
                "the root menu cannot be moved".to_string(),
            ));
        }
        if id == new_parent {
            return Err(EngineError::InvalidOperation(format!(
                "menu item {} cannot become its own parent",
                id
            )));
        }

        let (path, old_parent, ordinal) = self.atomically("reparent", |engine| {
            let old_parent = engine.parent_edge(id)?.parent;
            engine.require_node(new_parent)?;
            if engine.ancestors(new_parent)?.iter().any(|n| n.id == id) {
                return Err(EngineError::InvalidOperation(format!(
                    "menu item {} cannot move under its own descendant {}",
                    id, new_parent
                )));
            }

            engine.ranked_children(old_parent)?;
            let old = engine.store.get_edge(id)?;
            engine.renumber_after_removal(old_parent, old.ordinal)?;

            // Under the same parent the node still counts itself.
            let ordinal = if new_parent == old_parent {
                engine.store.count_children(new_parent)?
            } else {
                engine.append_at_end(new_parent)?
            };
            engine
                .store
                .update_edge(&Edge::new(id, new_parent, ordinal))?;
            Ok((engine.path_of(id)?, old_parent, ordinal))
        })?;
        tracing::info!(
            node = %id,
            from = %old_parent,
            to = %new_parent,
            ordinal,
            "reparented menu item"
        );
        Ok(path)
    }
}
