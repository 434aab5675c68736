//! Root bootstrap and path resolution.
//!
//! The root is not created by a migration. The first caller to reach the
//! menu runs [`MenuEngine::ensure_root`], which creates the well-known root
//! node (plus any configured seed children) in one transaction.

use wordtree_core::{validate_name, Edge, MenuPath, Node, NodeId};
use wordtree_storage::MenuStore;

use crate::error::EngineError;
use crate::MenuEngine;

impl<S: MenuStore> MenuEngine<S> {
    /// Returns the root node, creating it first if it does not exist yet.
    pub fn ensure_root(&mut self) -> Result<Node, EngineError> {
        if self.store.node_exists(NodeId::ROOT)? {
            return self.node(NodeId::ROOT);
        }

        let root_name = validate_name(&self.config.root_name)?;
        let seeds = self
            .config
            .seed_children
            .iter()
            .map(|name| validate_name(name))
            .collect::<Result<Vec<_>, _>>()?;

        let created = self.atomically("ensure_root", |engine| {
            // Another writer may have won the race before our transaction began.
            if engine.store.node_exists(NodeId::ROOT)? {
                return Ok(false);
            }
            engine
                .store
                .insert_node_with_id(NodeId::ROOT, &root_name, "")?;
            for (position, name) in seeds.iter().enumerate() {
                let id = engine.store.insert_node(name, "")?;
                engine
                    .store
                    .insert_edge(&Edge::new(id, NodeId::ROOT, position as u32 + 1))?;
            }
            Ok(true)
        })?;
        if created {
            tracing::info!(name = %root_name, seeds = seeds.len(), "created menu root");
        }
        self.node(NodeId::ROOT)
    }

    /// Resolves a root-first path to its target id.
    ///
    /// Every segment must exist and each consecutive pair must be a real
    /// parent and child; otherwise the path is `NotFound`. The empty path is
    /// the root.
    pub fn resolve_path(&self, path: &MenuPath) -> Result<NodeId, EngineError> {
        let segments = path.segments();
        let Some(first) = segments.first() else {
            self.require_node(NodeId::ROOT)?;
            return Ok(NodeId::ROOT);
        };
        if !first.is_root() {
            return Err(EngineError::NotFound(format!(
                "menu path {} does not start at the root",
                path
            )));
        }
        self.require_node(NodeId::ROOT)?;

        for pair in segments.windows(2) {
            let (parent, child) = (pair[0], pair[1]);
            let edge = self.parent_edge(child)?;
            if edge.parent != parent {
                return Err(EngineError::NotFound(format!(
                    "menu item {} is not a child of {}",
                    child, parent
                )));
            }
        }
        Ok(path.target())
    }
}
