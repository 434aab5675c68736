//! Traversal parameters and the materialized subtree type.
//!
//! The store is flat; [`TreeNode`] only exists as an owned snapshot built by
//! the engine for reporting and export.

use serde::{Deserialize, Serialize};

use crate::id::NodeId;
use crate::node::{ChildRef, Node};

/// Position of a node relative to its descendants in a traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraversalOrder {
    /// A node is listed before its children.
    Pre,
    /// A node is listed after all of its descendants.
    Post,
}

/// How many levels below the start node a traversal may descend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Depth {
    Unbounded,
    Limited(u32),
}

impl Depth {
    /// `None` means unbounded.
    pub fn from_option(depth: Option<u32>) -> Self {
        match depth {
            Some(n) => Depth::Limited(n),
            None => Depth::Unbounded,
        }
    }

    /// Returns `true` when no further level may be visited.
    pub fn is_exhausted(self) -> bool {
        matches!(self, Depth::Limited(0))
    }

    /// The budget left for the next level down.
    pub fn descend(self) -> Self {
        match self {
            Depth::Unbounded => Depth::Unbounded,
            Depth::Limited(n) => Depth::Limited(n.saturating_sub(1)),
        }
    }
}

/// One node of a materialized subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: NodeId,
    pub name: String,
    pub payload: String,
    /// Rank under its parent. `None` for the start node of a build.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<u32>,
    pub branches: Vec<TreeNode>,
}

impl TreeNode {
    /// A branchless tree node for the start of a build.
    pub fn from_node(node: Node) -> Self {
        TreeNode {
            id: node.id,
            name: node.name,
            payload: node.payload,
            ordinal: None,
            branches: Vec::new(),
        }
    }

    /// A branchless tree node for a child row.
    pub fn from_child(child: ChildRef) -> Self {
        TreeNode {
            id: child.id,
            name: child.name,
            payload: child.payload,
            ordinal: Some(child.ordinal),
            branches: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn size(&self) -> usize {
        1 + self.branches.iter().map(TreeNode::size).sum::<usize>()
    }

    /// Number of levels in this subtree; a leaf has height 1.
    pub fn height(&self) -> usize {
        1 + self.branches.iter().map(TreeNode::height).max().unwrap_or(0)
    }
}

/// A materialized subtree. Empty when the start node did not exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuTree {
    pub root: Option<TreeNode>,
}

impl MenuTree {
    pub fn empty() -> Self {
        MenuTree { root: None }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn size(&self) -> usize {
        self.root.as_ref().map_or(0, TreeNode::size)
    }
}
