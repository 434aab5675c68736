//! Ordinal manager: sibling ranks.
//!
//! Ranks are 1-based and contiguous within a parent once a mutation commits.
//! Rows written before ranking existed carry ordinal 0 and stay that way
//! until a reordering operation touches their sibling set; only then does
//! [`MenuEngine::ensure_ordinals`] number them.

use serde::{Deserialize, Serialize};

use wordtree_core::{ChildRef, NodeId};
use wordtree_storage::MenuStore;

use crate::error::EngineError;
use crate::MenuEngine;

/// Which neighbour a single-step move swaps with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Towards the end: swap with ordinal `k + 1`.
    Next,
    /// Towards the start: swap with ordinal `k - 1`.
    Prev,
}

impl<S: MenuStore> MenuEngine<S> {
    /// Numbers unranked edges in `children` 1..N in the given order.
    ///
    /// Does nothing unless some edge has ordinal 0. Assignment stops at the
    /// first edge that already has a rank; edges after it are assumed to be
    /// numbered. Returns `N`, the conventional last ordinal.
    pub fn ensure_ordinals(&mut self, children: &[ChildRef]) -> Result<u32, EngineError> {
        let last = children.len() as u32;
        if !children.iter().any(|c| c.edge().is_unranked()) {
            return Ok(last);
        }

        let assigned = self.atomically("ensure_ordinals", |engine| {
            let mut assigned = 0;
            for (position, child) in children.iter().enumerate() {
                if !child.edge().is_unranked() {
                    break;
                }
                engine.store.set_ordinal(child.id, position as u32 + 1)?;
                assigned += 1;
            }
            Ok(assigned)
        })?;
        tracing::info!(
            parent = ?children.first().map(|c| c.parent_id),
            assigned,
            "assigned ordinals to unranked children"
        );
        Ok(last)
    }

    /// Children of `parent` after any unranked edges among them were numbered.
    pub(crate) fn ranked_children(
        &mut self,
        parent: NodeId,
    ) -> Result<Vec<ChildRef>, EngineError> {
        let children = self.children(parent)?;
        if !children.iter().any(|c| c.edge().is_unranked()) {
            return Ok(children);
        }
        self.ensure_ordinals(&children)?;
        self.children(parent)
    }

    /// Swaps `node` with its next sibling. Returns `false` if it is already last.
    pub fn move_next(&mut self, node: NodeId, parent: NodeId) -> Result<bool, EngineError> {
        self.move_step(node, parent, Direction::Next)
    }

    /// Swaps `node` with its previous sibling. Returns `false` if it is already first.
    pub fn move_prev(&mut self, node: NodeId, parent: NodeId) -> Result<bool, EngineError> {
        self.move_step(node, parent, Direction::Prev)
    }

    /// Swaps the ordinals of `node` and its neighbour in `direction`, in one
    /// transaction.
    ///
    /// Fails with `NotFound` if `node` or `parent` is missing or `node` is
    /// not a child of `parent`.
    pub fn move_step(
        &mut self,
        node: NodeId,
        parent: NodeId,
        direction: Direction,
    ) -> Result<bool, EngineError> {
        let swapped = self.atomically("move_step", |engine| {
            let edge = engine.parent_edge(node)?;
            if edge.parent != parent {
                return Err(EngineError::NotFound(format!(
                    "menu item {} is not a child of {}",
                    node, parent
                )));
            }

            let siblings = engine.ranked_children(parent)?;
            let current = siblings
                .iter()
                .find(|c| c.id == node)
                .map(|c| c.ordinal)
                .ok_or_else(|| EngineError::no_such_node(node))?;
            let target = match direction {
                Direction::Next => current.checked_add(1),
                Direction::Prev => current.checked_sub(1).filter(|k| *k > 0),
            };
            let neighbour = target.and_then(|k| siblings.iter().find(|c| c.ordinal == k));

            match neighbour {
                Some(other) => {
                    engine.store.set_ordinal(node, other.ordinal)?;
                    engine.store.set_ordinal(other.id, current)?;
                    Ok(Some((other.id, other.ordinal)))
                }
                None => Ok(None),
            }
        })?;

        match swapped {
            Some((other, ordinal)) => {
                tracing::info!(%node, %parent, %other, ordinal, ?direction, "moved menu item");
                Ok(true)
            }
            None => {
                tracing::debug!(
                    %node,
                    %parent,
                    ?direction,
                    "move is a no-op at the edge of the sibling list"
                );
                Ok(false)
            }
        }
    }

    /// Closes the gap left by a child removed at `removed`: every sibling
    /// ranked above it moves down by one. Joins the caller's transaction.
    pub fn renumber_after_removal(
        &mut self,
        parent: NodeId,
        removed: u32,
    ) -> Result<usize, EngineError> {
        self.atomically("renumber_after_removal", |engine| {
            Ok(engine.store.close_ordinal_gap(parent, removed)?)
        })
    }

    /// The ordinal a child appended under `parent` should take.
    ///
    /// Only meaningful inside the caller's transaction: the count can change
    /// as soon as the transaction ends.
    pub fn append_at_end(&self, parent: NodeId) -> Result<u32, EngineError> {
        self.require_node(parent)?;
        Ok(self.store.count_children(parent)? + 1)
    }
}
