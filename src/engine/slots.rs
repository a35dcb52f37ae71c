// src/engine/slots.rs

use anyhow::anyhow;

use crate::errors::Result;
use crate::results::ExecutionResult;

/// Results indexed by selection position.
///
/// Each slot is assigned when the node is selected and written exactly once,
/// so the final order is the selection order no matter when nodes finish.
#[derive(Debug)]
pub struct ResultSlots {
    slots: Vec<Option<ExecutionResult>>,
}

impl ResultSlots {
    pub fn new(len: usize) -> Self {
        Self {
            slots: (0..len).map(|_| None).collect(),
        }
    }

    pub fn fill(&mut self, index: usize, result: ExecutionResult) -> Result<()> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or_else(|| anyhow!("result slot {index} out of range (len {len})"))?;
        if slot.is_some() {
            return Err(anyhow!(
                "result slot {index} for '{}' written twice",
                result.node.unique_id
            )
            .into());
        }
        *slot = Some(result);
        Ok(())
    }

    pub fn is_filled(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Some(_)))
    }

    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Ordered results; `missing` produces a result for any empty slot.
    pub fn into_results(
        self,
        mut missing: impl FnMut(usize) -> ExecutionResult,
    ) -> Vec<ExecutionResult> {
        self.slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| slot.unwrap_or_else(|| missing(i)))
            .collect()
    }
}
