// src/graph/node.rs

use std::path::PathBuf;

use crate::types::ResourceType;

/// Identifier of a node, `<type>.<name>` (e.g. `seed.raw_customers`).
pub type NodeId = String;

/// One schedulable unit of the project graph.
///
/// Nodes are built once when the manifest is assembled and shared as
/// `Arc<ResourceNode>` from then on; nothing mutates them afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNode {
    pub unique_id: NodeId,
    pub name: String,
    pub resource_type: ResourceType,
    /// Owning namespace.
    pub schema: String,
    /// Relation name inside `schema`.
    pub alias: String,
    /// Source file, already resolved against the project root.
    pub path: Option<PathBuf>,
    /// Direct upstream node ids.
    pub depends_on: Vec<NodeId>,
    /// Content checksum used for state comparison.
    pub checksum: String,
}

impl ResourceNode {
    pub fn new(resource_type: ResourceType, name: impl Into<String>, schema: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            unique_id: Self::unique_id_for(resource_type, &name),
            alias: name.clone(),
            name,
            resource_type,
            schema: schema.into(),
            path: None,
            depends_on: Vec::new(),
            checksum: String::new(),
        }
    }

    pub fn unique_id_for(resource_type: ResourceType, name: &str) -> NodeId {
        format!("{resource_type}.{name}")
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_depends_on(mut self, ids: impl IntoIterator<Item = NodeId>) -> Self {
        self.depends_on = ids.into_iter().collect();
        self
    }

    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = checksum.into();
        self
    }

    /// `<schema>.<alias>`, as shown in log lines and sample headers.
    pub fn relation(&self) -> String {
        format!("{}.{}", self.schema, self.alias)
    }
}
