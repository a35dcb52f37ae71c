use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Declared type of a resource in the project graph.
///
/// Only `Seed` resources are executed by the seed task; the other variants
/// exist so a project can declare them and the selector can filter them out.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    #[default]
    Seed,
    Model,
    Snapshot,
    Test,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Seed => "seed",
            ResourceType::Model => "model",
            ResourceType::Snapshot => "snapshot",
            ResourceType::Test => "test",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "seed" => Ok(ResourceType::Seed),
            "model" => Ok(ResourceType::Model),
            "snapshot" => Ok(ResourceType::Snapshot),
            "test" => Ok(ResourceType::Test),
            other => Err(format!(
                "invalid resource type: {other} (expected \"seed\", \"model\", \"snapshot\" or \"test\")"
            )),
        }
    }
}

/// Final status of one node in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeStatus {
    Success,
    Error,
    /// Not executed: fail-fast stopped scheduling before the node was
    /// reached.
    Skipped,
}

impl NodeStatus {
    pub fn is_error(&self) -> bool {
        matches!(self, NodeStatus::Error)
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeStatus::Success => "success",
            NodeStatus::Error => "error",
            NodeStatus::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

/// Severity attached to every event handed to an [`crate::events::EventSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventLevel {
    Debug,
    Info,
    Warn,
    Error,
}
