//! Stable identifier newtype for menu nodes.
//!
//! A [`NodeId`] wraps the `i64` row id of a stored node. Ids are allocated by
//! the store, are globally unique, and are never reused after deletion.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Menu node identifier. The inner `i64` aligns with SQLite's
/// `INTEGER PRIMARY KEY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i64);

impl NodeId {
    /// The well-known id of the root node.
    pub const ROOT: NodeId = NodeId(1);

    /// Smallest id a stored node can have. Lookups below it never reach the store.
    pub const MIN: NodeId = NodeId(1);

    /// Returns `true` if this id could reference a stored node.
    pub fn is_valid(self) -> bool {
        self >= Self::MIN
    }

    /// Returns `true` for the well-known root id.
    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(NodeId)
    }
}
