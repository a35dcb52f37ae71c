use std::collections::BTreeMap;
use std::sync::Arc;

use seedrun::config::{ConfigSection, ProjectFile, RawProjectFile, ResourceConfig};
use seedrun::graph::{Manifest, ResourceGraph, ResourceNode};
use seedrun::types::ResourceType;

/// Builder for `ProjectFile` to simplify test setup.
pub struct ProjectBuilder {
    project: RawProjectFile,
}

impl ProjectBuilder {
    pub fn new() -> Self {
        Self {
            project: RawProjectFile {
                config: ConfigSection::default(),
                resource: BTreeMap::new(),
            },
        }
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.project.config.threads = threads;
        self
    }

    pub fn fail_fast(mut self, val: bool) -> Self {
        self.project.config.fail_fast = val;
        self
    }

    pub fn with_resource(mut self, name: &str, res: ResourceConfig) -> Self {
        self.project.resource.insert(name.to_string(), res);
        self
    }

    pub fn with_seed(self, name: &str) -> Self {
        self.with_resource(name, ResourceConfigBuilder::seed().build())
    }

    pub fn build_raw(self) -> RawProjectFile {
        self.project
    }

    pub fn build(self) -> ProjectFile {
        ProjectFile::try_from(self.project).expect("Failed to build valid project from builder")
    }
}

impl Default for ProjectBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `ResourceConfig`.
pub struct ResourceConfigBuilder {
    res: ResourceConfig,
}

impl ResourceConfigBuilder {
    pub fn of_type(resource_type: ResourceType) -> Self {
        Self {
            res: ResourceConfig {
                resource_type,
                ..ResourceConfig::default()
            },
        }
    }

    pub fn seed() -> Self {
        Self::of_type(ResourceType::Seed)
    }

    pub fn model() -> Self {
        Self::of_type(ResourceType::Model)
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.res.after.push(dep.to_string());
        self
    }

    pub fn path(mut self, path: &str) -> Self {
        self.res.path = Some(path.to_string());
        self
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.res.alias = Some(alias.to_string());
        self
    }

    pub fn schema(mut self, schema: &str) -> Self {
        self.res.schema = Some(schema.to_string());
        self
    }

    pub fn build(self) -> ResourceConfig {
        self.res
    }
}

/// Builds a `Manifest` and `ResourceGraph` directly from nodes, without a
/// project file. Nodes live in schema `main`.
pub struct GraphBuilder {
    nodes: Vec<ResourceNode>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Independent seeds named after `names`.
    pub fn seeds(names: &[&str]) -> Self {
        names.iter().fold(Self::new(), |b, n| b.seed(n))
    }

    pub fn seed(self, name: &str) -> Self {
        self.seed_after(name, &[])
    }

    /// A seed depending on other seeds (by name).
    pub fn seed_after(mut self, name: &str, deps: &[&str]) -> Self {
        let deps = deps
            .iter()
            .map(|d| ResourceNode::unique_id_for(ResourceType::Seed, d));
        self.nodes.push(
            ResourceNode::new(ResourceType::Seed, name, "main")
                .with_depends_on(deps)
                .with_checksum(format!("{name}-v1")),
        );
        self
    }

    pub fn node(mut self, node: ResourceNode) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn model(self, name: &str) -> Self {
        self.node(ResourceNode::new(ResourceType::Model, name, "main"))
    }

    pub fn build(self) -> (Arc<ResourceGraph>, Arc<Manifest>) {
        let manifest = Manifest::from_nodes(self.nodes);
        let graph = ResourceGraph::from_manifest(&manifest).expect("Failed to build resource graph");
        (Arc::new(graph), Arc::new(manifest))
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
