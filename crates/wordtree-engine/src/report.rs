//! Whole-tree report.

use serde::Serialize;

use wordtree_core::{MenuTree, NodeId};
use wordtree_storage::MenuStore;

use crate::error::EngineError;
use crate::MenuEngine;

/// Counts and a full snapshot of the menu tree.
#[derive(Debug, Clone, Serialize)]
pub struct TreeReport {
    /// Rows in the node table.
    pub nodes: u64,
    /// Rows in the edge table.
    pub edges: u64,
    /// Nodes reachable from the root, the root included.
    pub reachable: usize,
    /// Levels below the root; 0 for a childless root.
    pub depth: usize,
    pub tree: MenuTree,
}

impl TreeReport {
    /// Stored nodes that cannot be reached from the root.
    pub fn unreachable(&self) -> u64 {
        self.nodes.saturating_sub(self.reachable as u64)
    }
}

impl<S: MenuStore> MenuEngine<S> {
    /// Builds a [`TreeReport`] from the root. An empty store reports zeros.
    pub fn report(&self) -> Result<TreeReport, EngineError> {
        let (tree, reachable) = self.build_tree(NodeId::ROOT)?;
        let depth = tree.root.as_ref().map_or(0, |root| root.height() - 1);
        let report = TreeReport {
            nodes: self.store.count_nodes()?,
            edges: self.store.count_edges()?,
            reachable,
            depth,
            tree,
        };
        if report.unreachable() > 0 {
            tracing::warn!(
                unreachable = report.unreachable(),
                "menu store holds unreachable nodes"
            );
        }
        Ok(report)
    }
}
