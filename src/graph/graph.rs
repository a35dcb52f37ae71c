// src/graph/graph.rs

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::errors::{Result, SeedrunError};
use crate::graph::manifest::Manifest;
use crate::graph::node::NodeId;

/// Dependency graph over the nodes of a [`Manifest`].
///
/// Edge direction: dependency -> dependent. The topological order is computed
/// once at construction; independent nodes keep manifest (unique id) order so
/// runs are reproducible.
#[derive(Debug, Clone)]
pub struct ResourceGraph {
    graph: DiGraph<NodeId, ()>,
    index: HashMap<NodeId, NodeIndex>,
    order: Vec<NodeId>,
}

impl ResourceGraph {
    pub fn from_manifest(manifest: &Manifest) -> Result<Self> {
        let mut graph = DiGraph::new();
        let mut index = HashMap::new();

        for node in manifest.nodes() {
            let ix = graph.add_node(node.unique_id.clone());
            index.insert(node.unique_id.clone(), ix);
        }

        for node in manifest.nodes() {
            let to = index[&node.unique_id];
            for dep in &node.depends_on {
                let from = *index.get(dep).ok_or_else(|| {
                    SeedrunError::NodeNotFound(format!(
                        "'{}' depends on unknown resource '{}'",
                        node.unique_id, dep
                    ))
                })?;
                graph.update_edge(from, to, ());
            }
        }

        if let Err(cycle) = toposort(&graph, None) {
            return Err(SeedrunError::DagCycle(format!(
                "cycle detected in resource graph involving '{}'",
                graph[cycle.node_id()]
            )));
        }

        let order = stable_topological_order(&graph);

        Ok(Self { graph, index, order })
    }

    /// Every node id, dependencies before dependents.
    pub fn topological_order(&self) -> &[NodeId] {
        &self.order
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Immediate dependencies of `id`.
    pub fn dependencies_of(&self, id: &str) -> Vec<&NodeId> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Immediate dependents of `id`.
    pub fn dependents_of(&self, id: &str) -> Vec<&NodeId> {
        self.neighbors(id, Direction::Outgoing)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn neighbors(&self, id: &str, dir: Direction) -> Vec<&NodeId> {
        let Some(&ix) = self.index.get(id) else {
            return Vec::new();
        };
        let mut out: Vec<&NodeId> = self
            .graph
            .neighbors_directed(ix, dir)
            .map(|n| &self.graph[n])
            .collect();
        out.sort();
        out
    }
}

/// Kahn's algorithm, always releasing the lowest node index first.
///
/// Assumes the graph is acyclic.
fn stable_topological_order(graph: &DiGraph<NodeId, ()>) -> Vec<NodeId> {
    let mut in_degree: Vec<usize> = graph
        .node_indices()
        .map(|ix| graph.neighbors_directed(ix, Direction::Incoming).count())
        .collect();

    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, d)| **d == 0)
        .map(|(i, _)| Reverse(i))
        .collect();

    let mut order = Vec::with_capacity(graph.node_count());
    while let Some(Reverse(i)) = ready.pop() {
        let ix = NodeIndex::new(i);
        order.push(graph[ix].clone());
        for succ in graph.neighbors_directed(ix, Direction::Outgoing) {
            let d = &mut in_degree[succ.index()];
            *d -= 1;
            if *d == 0 {
                ready.push(Reverse(succ.index()));
            }
        }
    }
    order
}
