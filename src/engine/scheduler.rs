// src/engine/scheduler.rs

//! Per-run scheduling state over the selected nodes.
//!
//! Pure and synchronous: no Tokio types, no IO. Nodes are addressed by their
//! index in the selection. A node becomes ready once every *selected* direct
//! upstream has finished, successfully or not; upstreams outside the
//! selection are treated as satisfied. The only way a node ends up skipped
//! is [`RunScheduler::abort`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::graph::{ResourceGraph, ResourceNode};
use crate::types::NodeStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Waiting,
    Running,
    Done(NodeStatus),
}

#[derive(Debug)]
pub struct RunScheduler {
    upstream: Vec<Vec<usize>>,
    state: Vec<SlotState>,
}

impl RunScheduler {
    pub fn new(nodes: &[Arc<ResourceNode>], graph: &ResourceGraph) -> Self {
        let position: HashMap<&str, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.unique_id.as_str(), i))
            .collect();

        let mut upstream = vec![Vec::new(); nodes.len()];
        for (i, node) in nodes.iter().enumerate() {
            for dep in graph.dependencies_of(&node.unique_id) {
                if let Some(&j) = position.get(dep.as_str()) {
                    upstream[i].push(j);
                }
            }
        }

        Self {
            upstream,
            state: vec![SlotState::Waiting; nodes.len()],
        }
    }

    /// Lowest-index waiting node whose upstreams have all finished, marked
    /// `Running`.
    pub fn next_ready(&mut self) -> Option<usize> {
        let idx = (0..self.state.len()).find(|&i| {
            self.state[i] == SlotState::Waiting
                && self.upstream[i]
                    .iter()
                    .all(|&u| matches!(self.state[u], SlotState::Done(_)))
        })?;
        self.state[idx] = SlotState::Running;
        Some(idx)
    }

    /// Record a finished node. Its dependents become eligible whatever the
    /// status was.
    pub fn complete(&mut self, idx: usize, status: NodeStatus) {
        self.state[idx] = SlotState::Done(status);
    }

    /// Skip everything not yet started.
    pub fn abort(&mut self) -> Vec<usize> {
        let mut skipped = Vec::new();
        for (i, s) in self.state.iter_mut().enumerate() {
            if *s == SlotState::Waiting {
                *s = SlotState::Done(NodeStatus::Skipped);
                skipped.push(i);
            }
        }
        skipped
    }

    pub fn state_of(&self, idx: usize) -> Option<SlotState> {
        self.state.get(idx).copied()
    }

    pub fn is_finished(&self) -> bool {
        self.state.iter().all(|s| matches!(s, SlotState::Done(_)))
    }
}
