//! Menu node, parent edge, and traversal row types.
//!
//! [`Node`] and [`Edge`] mirror the two persisted record sets. [`ChildRef`] is
//! the immutable row produced by every child enumeration and traversal: a node
//! joined with the edge that attaches it to its parent.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::NodeId;

/// Maximum length of a node name, in characters.
pub const MAX_NAME_LEN: usize = 50;

/// Ordinal value of an edge that has not been ranked yet.
pub const UNASSIGNED_ORDINAL: u32 = 0;

/// A named menu entry with a free-text payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub payload: String,
}

/// Parent relationship of a single child.
///
/// Keyed by `child`: a node has at most one incoming edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub child: NodeId,
    pub parent: NodeId,
    /// 1-based sibling rank. [`UNASSIGNED_ORDINAL`] until ranked.
    pub ordinal: u32,
}

impl Edge {
    pub fn new(child: NodeId, parent: NodeId, ordinal: u32) -> Self {
        Edge {
            child,
            parent,
            ordinal,
        }
    }

    /// Returns `true` if this edge still carries the unassigned ordinal.
    pub fn is_unranked(&self) -> bool {
        self.ordinal == UNASSIGNED_ORDINAL
    }
}

/// A child node together with its parent and rank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildRef {
    pub id: NodeId,
    pub parent_id: NodeId,
    pub name: String,
    pub payload: String,
    pub ordinal: u32,
}

impl ChildRef {
    /// The edge this row was read through.
    pub fn edge(&self) -> Edge {
        Edge::new(self.id, self.parent_id, self.ordinal)
    }
}

/// Trims `name` and checks it against the menu naming rules.
///
/// Returns the trimmed name on success.
pub fn validate_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::EmptyName);
    }
    let len = trimmed.chars().count();
    if len > MAX_NAME_LEN {
        return Err(CoreError::NameTooLong {
            len,
            max: MAX_NAME_LEN,
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_name_trims() {
        assert_eq!(validate_name("  Soups ").unwrap(), "Soups");
    }

    #[test]
    fn validate_name_rejects_blank() {
        assert_eq!(validate_name("   "), Err(CoreError::EmptyName));
    }

    #[test]
    fn validate_name_counts_chars_not_bytes() {
        let fifty = "é".repeat(MAX_NAME_LEN);
        assert!(validate_name(&fifty).is_ok());

        let too_long = "x".repeat(MAX_NAME_LEN + 1);
        assert_eq!(
            validate_name(&too_long),
            Err(CoreError::NameTooLong {
                len: MAX_NAME_LEN + 1,
                max: MAX_NAME_LEN
            })
        );
    }

    #[test]
    fn child_ref_exposes_its_edge() {
        let row = ChildRef {
            id: NodeId(5),
            parent_id: NodeId(2),
            name: "Tea".into(),
            payload: "green".into(),
            ordinal: 3,
        };
        assert_eq!(row.edge(), Edge::new(NodeId(5), NodeId(2), 3));
        assert!(!row.edge().is_unranked());
        assert!(ChildRef { ordinal: 0, ..row }.edge().is_unranked());
    }
}
