// src/graph/state.rs

//! State of the previous run, used for `--modified` selection.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::graph::node::{NodeId, ResourceNode};
use crate::results::RunSummary;
use crate::types::NodeStatus;

/// Checksums of the nodes that succeeded in earlier runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviousState {
    #[serde(default)]
    pub checksums: BTreeMap<NodeId, String>,
}

impl PreviousState {
    pub fn load(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        let contents = fs.read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn save(&self, fs: &dyn FileSystem, path: &Path) -> Result<()> {
        let contents = toml::to_string(self)?;
        fs.write(path, contents.as_bytes())?;
        Ok(())
    }

    /// A node is modified when it has no recorded checksum or a different one.
    pub fn is_modified(&self, node: &ResourceNode) -> bool {
        self.checksums.get(&node.unique_id) != Some(&node.checksum)
    }

    /// Fold a finished run into the state: successes record their checksum,
    /// errors forget it so the node counts as modified next time. Skipped
    /// nodes keep whatever was recorded before.
    pub fn record(&mut self, summary: &RunSummary) {
        for result in summary.results() {
            match result.status {
                NodeStatus::Success => {
                    self.checksums
                        .insert(result.node.unique_id.clone(), result.node.checksum.clone());
                }
                NodeStatus::Error => {
                    self.checksums.remove(&result.node.unique_id);
                }
                NodeStatus::Skipped => {}
            }
        }
    }
}
