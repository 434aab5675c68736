//! Value types for the wordtree ordered menu tree.
//!
//! Nothing in this crate touches storage. The store crate persists
//! [`Node`] and [`Edge`] records; the engine crate reads them back as
//! [`ChildRef`] rows and materializes [`MenuTree`] snapshots.

pub mod error;
pub mod id;
pub mod node;
pub mod path;
pub mod tree;

// Re-export commonly used types
pub use error::CoreError;
pub use id::NodeId;
pub use node::{validate_name, ChildRef, Edge, Node, MAX_NAME_LEN, UNASSIGNED_ORDINAL};
pub use path::MenuPath;
pub use tree::{Depth, MenuTree, TraversalOrder, TreeNode};
