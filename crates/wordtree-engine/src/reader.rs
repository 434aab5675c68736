//! Tree reader: ordered children, ancestor chains, depth-first descent.
//!
//! The store has no tree type. Every traversal here is a recursive procedure
//! over node ids that issues one bounded `children` query per visited node
//! and appends to an accumulator, so memory follows the frontier rather than
//! the whole tree.

use std::collections::HashSet;

use wordtree_core::{ChildRef, Depth, MenuPath, MenuTree, Node, NodeId, TraversalOrder, TreeNode};
use wordtree_storage::{MenuStore, StorageError};

use crate::error::EngineError;
use crate::MenuEngine;

impl<S: MenuStore> MenuEngine<S> {
    /// Looks up a single node.
    pub fn node(&self, id: NodeId) -> Result<Node, EngineError> {
        if !id.is_valid() {
            return Err(EngineError::no_such_node(id));
        }
        Ok(self.store.get_node(id)?)
    }

    /// Children of `parent`, ordered by ordinal then child id.
    ///
    /// Fails with `NotFound` if `parent` does not exist. A childless node
    /// yields an empty vector.
    pub fn children(&self, parent: NodeId) -> Result<Vec<ChildRef>, EngineError> {
        self.require_node(parent)?;
        Ok(self.store.child_refs(parent)?)
    }

    /// The chain from `id` up to and including the root.
    ///
    /// Fails with `NotFound` if any link is missing before the root is
    /// reached; a broken chain is never truncated.
    pub fn ancestors(&self, id: NodeId) -> Result<Vec<Node>, EngineError> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = id;
        loop {
            if !seen.insert(current) {
                return Err(EngineError::StoreFailure(StorageError::IntegrityError {
                    reason: format!("parent chain of {} loops at {}", id, current),
                }));
            }
            chain.push(self.node(current)?);
            if current.is_root() {
                break;
            }
            current = self.store.get_edge(current)?.parent;
        }
        Ok(chain)
    }

    /// The root-first path of `id`.
    pub fn path_of(&self, id: NodeId) -> Result<MenuPath, EngineError> {
        let chain = self.ancestors(id)?;
        Ok(MenuPath::from_ancestors(chain.into_iter().map(|n| n.id)))
    }

    /// Depth-first descent below `start`; `start` itself is never included.
    ///
    /// Siblings are visited in ordinal order at every level. With
    /// [`TraversalOrder::Post`] each node comes after all of its descendants,
    /// the order a bottom-up delete needs.
    pub fn descendants(
        &self,
        start: NodeId,
        order: TraversalOrder,
        depth: Depth,
    ) -> Result<Vec<ChildRef>, EngineError> {
        self.require_node(start)?;
        let mut out = Vec::new();
        self.descend(start, order, depth, &mut out)?;
        tracing::debug!(%start, ?order, ?depth, visited = out.len(), "descended");
        Ok(out)
    }

    fn descend(
        &self,
        parent: NodeId,
        order: TraversalOrder,
        depth: Depth,
        out: &mut Vec<ChildRef>,
    ) -> Result<(), EngineError> {
        if depth.is_exhausted() {
            return Ok(());
        }
        for child in self.children(parent)? {
            let id = child.id;
            match order {
                TraversalOrder::Pre => {
                    out.push(child);
                    self.descend(id, order, depth.descend(), out)?;
                }
                TraversalOrder::Post => {
                    self.descend(id, order, depth.descend(), out)?;
                    out.push(child);
                }
            }
        }
        Ok(())
    }

    /// Materializes the whole subtree rooted at `start`.
    ///
    /// Returns the tree and the number of nodes visited, `start` included.
    /// A missing `start` yields an empty tree and a count of zero.
    pub fn build_tree(&self, start: NodeId) -> Result<(MenuTree, usize), EngineError> {
        self.build_tree_to_depth(start, Depth::Unbounded)
    }

    /// [`MenuEngine::build_tree`] limited to `depth` levels below `start`.
    pub fn build_tree_to_depth(
        &self,
        start: NodeId,
        depth: Depth,
    ) -> Result<(MenuTree, usize), EngineError> {
        if !start.is_valid() {
            return Ok((MenuTree::empty(), 0));
        }
        let node = match self.store.get_node(start) {
            Ok(node) => node,
            Err(err) if err.is_not_found() => return Ok((MenuTree::empty(), 0)),
            Err(err) => return Err(err.into()),
        };

        let mut root = TreeNode::from_node(node);
        let mut count = 1;
        self.grow(&mut root, depth, &mut count)?;
        Ok((MenuTree { root: Some(root) }, count))
    }

    fn grow(
        &self,
        node: &mut TreeNode,
        depth: Depth,
        count: &mut usize,
    ) -> Result<(), EngineError> {
        if depth.is_exhausted() {
            return Ok(());
        }
        // Read the store directly: a branch deleted mid-build just comes back empty.
        for child in self.store.child_refs(node.id)? {
            let mut branch = TreeNode::from_child(child);
            *count += 1;
            self.grow(&mut branch, depth.descend(), count)?;
            node.branches.push(branch);
        }
        Ok(())
    }
}
