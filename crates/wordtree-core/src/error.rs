//! Core error types for wordtree-core.
//!
//! Uses `thiserror` for the validation failures that can be detected without
//! touching a store: malformed paths and unacceptable node names.

use thiserror::Error;

/// Errors produced by wordtree-core validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A path segment was not a positive integer id.
    #[error("malformed menu path '{path}': segment '{segment}' is not a valid id")]
    MalformedPath { path: String, segment: String },

    /// A node name was empty after trimming.
    #[error("menu name must not be empty")]
    EmptyName,

    /// A node name exceeded [`crate::node::MAX_NAME_LEN`] characters.
    #[error("menu name is {len} characters, the limit is {max}")]
    NameTooLong { len: usize, max: usize },
}
