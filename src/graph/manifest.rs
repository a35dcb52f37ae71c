// src/graph/manifest.rs

//! Node store keyed by unique id.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::config::model::ProjectFile;
use crate::fs::FileSystem;
use crate::graph::node::{NodeId, ResourceNode};
use crate::types::ResourceType;

/// All nodes of a project, keyed by [`NodeId`].
///
/// Iteration is ordered by unique id, which keeps graph construction and
/// therefore the topological order deterministic.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    nodes: BTreeMap<NodeId, Arc<ResourceNode>>,
}

impl Manifest {
    pub fn from_nodes(nodes: impl IntoIterator<Item = ResourceNode>) -> Self {
        let nodes = nodes
            .into_iter()
            .map(|n| (n.unique_id.clone(), Arc::new(n)))
            .collect();
        Self { nodes }
    }

    /// Build the manifest for a validated project.
    ///
    /// Relative paths are resolved against `root`. Seed checksums hash the
    /// file contents; when the file cannot be read (or the resource has no
    /// file) the declaration itself is hashed instead, so state comparison
    /// still works.
    pub fn from_project(project: &ProjectFile, root: &Path, fs: &dyn FileSystem) -> Self {
        let nodes = project.resource.iter().map(|(name, res)| {
            let deps = res
                .after
                .iter()
                .map(|dep| {
                    let dep_type = project
                        .resource
                        .get(dep)
                        .map(|d| d.resource_type)
                        .unwrap_or_default();
                    ResourceNode::unique_id_for(dep_type, dep)
                })
                .collect::<Vec<_>>();

            let mut node = ResourceNode::new(res.resource_type, name, project.schema_of(res))
                .with_depends_on(deps);
            if let Some(alias) = &res.alias {
                node = node.with_alias(alias);
            }
            if let Some(path) = res.effective_path(name) {
                node = node.with_path(root.join(path));
            }
            let checksum = checksum_for(&node, fs);
            node.with_checksum(checksum)
        });

        Self::from_nodes(nodes)
    }

    pub fn get(&self, id: &str) -> Option<&Arc<ResourceNode>> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Arc<ResourceNode>> {
        self.nodes.values()
    }

    pub fn nodes_of_type(&self, resource_type: ResourceType) -> impl Iterator<Item = &Arc<ResourceNode>> {
        self.nodes
            .values()
            .filter(move |n| n.resource_type == resource_type)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn checksum_for(node: &ResourceNode, fs: &dyn FileSystem) -> String {
    if let Some(path) = &node.path {
        match fs.read(path) {
            Ok(bytes) => return blake3::hash(&bytes).to_hex().to_string(),
            Err(err) => {
                debug!(node = %node.unique_id, error = %err, "source file unreadable; hashing declaration");
            }
        }
    }

    let mut hasher = blake3::Hasher::new();
    hasher.update(node.unique_id.as_bytes());
    hasher.update(node.schema.as_bytes());
    hasher.update(node.alias.as_bytes());
    hasher.finalize().to_hex().to_string()
}
