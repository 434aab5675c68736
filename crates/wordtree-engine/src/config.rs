//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Settings for root bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Name given to the root node when it is first created.
    pub root_name: String,
    /// Children created under a brand-new root, in order.
    pub seed_children: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            root_name: "Menu".to_string(),
            seed_children: Vec::new(),
        }
    }
}

impl EngineConfig {
    pub fn with_root_name(mut self, name: impl Into<String>) -> Self {
        self.root_name = name.into();
        self
    }

    pub fn with_seed_children<I, T>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.seed_children = names.into_iter().map(Into::into).collect();
        self
    }
}
