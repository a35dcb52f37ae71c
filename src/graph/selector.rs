// src/graph/selector.rs

//! Resource selection: which nodes of the graph take part in a run.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::errors::{Result, SeedrunError};
use crate::graph::graph::ResourceGraph;
use crate::graph::manifest::Manifest;
use crate::graph::node::ResourceNode;
use crate::graph::state::PreviousState;
use crate::types::ResourceType;

/// What a task invocation wants to run. Built once, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct SelectionCriteria {
    pub resource_types: BTreeSet<ResourceType>,
    /// Restrict to these resource names.
    pub names: Option<BTreeSet<String>>,
    pub previous_state: Option<Arc<PreviousState>>,
    /// Keep only nodes whose checksum differs from `previous_state`.
    pub modified_only: bool,
}

impl SelectionCriteria {
    pub fn for_types(types: impl IntoIterator<Item = ResourceType>) -> Self {
        Self {
            resource_types: types.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn with_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_previous_state(mut self, state: Arc<PreviousState>, modified_only: bool) -> Self {
        self.previous_state = Some(state);
        self.modified_only = modified_only;
        self
    }

    fn matches(&self, node: &ResourceNode) -> bool {
        if !self.resource_types.contains(&node.resource_type) {
            return false;
        }
        if let Some(names) = &self.names {
            if !names.contains(&node.name) {
                return false;
            }
        }
        if self.modified_only {
            // Without a previous state every node counts as modified.
            if let Some(state) = &self.previous_state {
                return state.is_modified(node);
            }
        }
        true
    }
}

/// Filter the graph down to the nodes matching `criteria`, in topological
/// order.
///
/// Fails with [`SeedrunError::Precondition`] before touching either input if
/// the graph or the manifest is missing.
pub fn select(
    graph: Option<&ResourceGraph>,
    manifest: Option<&Manifest>,
    criteria: &SelectionCriteria,
) -> Result<Vec<Arc<ResourceNode>>> {
    let (Some(graph), Some(manifest)) = (graph, manifest) else {
        return Err(SeedrunError::Precondition(
            "graph and manifest must be set to perform node selection".to_string(),
        ));
    };

    let mut selected = Vec::new();
    for id in graph.topological_order() {
        let node = manifest
            .get(id)
            .ok_or_else(|| SeedrunError::NodeNotFound(id.clone()))?;
        if criteria.matches(node) {
            selected.push(Arc::clone(node));
        }
    }

    if let Some(names) = &criteria.names {
        for name in names {
            if !manifest.nodes().any(|n| &n.name == name) {
                warn!(name = %name, "selection names a resource that does not exist");
            }
        }
    }

    debug!(
        selected = selected.len(),
        total = graph.len(),
        types = ?criteria.resource_types,
        "resource selection complete"
    );

    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (ResourceGraph, Manifest) {
        let manifest = Manifest::from_nodes(vec![
            ResourceNode::new(ResourceType::Seed, "a", "main").with_checksum("1"),
            ResourceNode::new(ResourceType::Seed, "b", "main").with_checksum("2"),
            ResourceNode::new(ResourceType::Model, "m", "main")
                .with_depends_on(["seed.a".to_string()]),
        ]);
        let graph = ResourceGraph::from_manifest(&manifest).unwrap();
        (graph, manifest)
    }

    fn ids(nodes: &[Arc<ResourceNode>]) -> Vec<&str> {
        nodes.iter().map(|n| n.unique_id.as_str()).collect()
    }

    #[test]
    fn filters_by_type() {
        let (graph, manifest) = fixture();
        let criteria = SelectionCriteria::for_types([ResourceType::Seed]);
        let nodes = select(Some(&graph), Some(&manifest), &criteria).unwrap();
        assert_eq!(ids(&nodes), vec!["seed.a", "seed.b"]);
    }

    #[test]
    fn missing_inputs_fail_the_precondition() {
        let (graph, manifest) = fixture();
        let criteria = SelectionCriteria::for_types([ResourceType::Seed]);

        let err = select(None, Some(&manifest), &criteria).unwrap_err();
        assert!(matches!(err, SeedrunError::Precondition(_)));
        let err = select(Some(&graph), None, &criteria).unwrap_err();
        assert!(matches!(err, SeedrunError::Precondition(_)));
    }

    #[test]
    fn filters_by_name() {
        let (graph, manifest) = fixture();
        let criteria = SelectionCriteria::for_types([ResourceType::Seed]).with_names(["b"]);
        let nodes = select(Some(&graph), Some(&manifest), &criteria).unwrap();
        assert_eq!(ids(&nodes), vec!["seed.b"]);
    }

    #[test]
    fn modified_only_compares_checksums() {
        let (graph, manifest) = fixture();
        let mut state = PreviousState::default();
        state.checksums.insert("seed.a".into(), "1".into());
        state.checksums.insert("seed.b".into(), "old".into());

        let criteria = SelectionCriteria::for_types([ResourceType::Seed])
            .with_previous_state(Arc::new(state), true);
        let nodes = select(Some(&graph), Some(&manifest), &criteria).unwrap();
        assert_eq!(ids(&nodes), vec!["seed.b"]);
    }
}
