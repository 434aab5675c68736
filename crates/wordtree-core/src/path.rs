//! Slash-delimited menu paths.
//!
//! A [`MenuPath`] is the list of ids from the root down to a target node, as
//! written in menu URLs: `"1/4/9/"`. The empty path addresses the root. The
//! engine checks that a parsed path follows real edges before acting on it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::NodeId;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuPath {
    segments: Vec<NodeId>,
}

impl MenuPath {
    /// The path addressing the root.
    pub fn root() -> Self {
        MenuPath {
            segments: Vec::new(),
        }
    }

    /// Parses `"1/4/9/"`, `"1/4/9"` or `""`.
    ///
    /// Every segment must be an id `>=` [`NodeId::MIN`]; empty inner segments
    /// (`"1//4"`) are rejected.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim().trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        let mut segments = Vec::new();
        for segment in trimmed.split('/') {
            let id = segment
                .parse::<NodeId>()
                .ok()
                .filter(|id| id.is_valid())
                .ok_or_else(|| CoreError::MalformedPath {
                    path: raw.to_string(),
                    segment: segment.to_string(),
                })?;
            segments.push(id);
        }
        Ok(MenuPath { segments })
    }

    /// Builds a path from an ancestor chain ordered node-first, root-last.
    pub fn from_ancestors<I>(ancestors: I) -> Self
    where
        I: IntoIterator<Item = NodeId>,
        I::IntoIter: DoubleEndedIterator,
    {
        MenuPath {
            segments: ancestors.into_iter().rev().collect(),
        }
    }

    /// The node this path points at. The root when the path is empty.
    pub fn target(&self) -> NodeId {
        self.segments.last().copied().unwrap_or(NodeId::ROOT)
    }

    /// The explicit segments, root first.
    pub fn segments(&self) -> &[NodeId] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.target().is_root()
    }
}

impl FromStr for MenuPath {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MenuPath::parse(s)
    }
}

impl fmt::Display for MenuPath {
    /// Renders with a trailing slash; the empty path renders as the root id.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "{}/", NodeId::ROOT);
        }
        for id in &self.segments {
            write!(f, "{}/", id)?;
        }
        Ok(())
    }
}
