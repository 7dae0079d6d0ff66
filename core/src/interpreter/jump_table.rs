//! Loop jump table
//!
//! Pairs every loop-open (`QUT`) with its loop-close (`qut`) in one
//! left-to-right pass. Nesting falls out of the stack: the innermost pending
//! open is matched first.

use std::collections::HashMap;

use super::errors::{QutError, QutResult};
use super::opcode::Opcode;

/// Bidirectional mapping between matched loop-open and loop-close positions
///
/// Every entry has a partner pointing back at it and no position maps to
/// itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JumpTable {
    targets: HashMap<usize, usize>,
}

impl JumpTable {
    /// Build the table for a program, rejecting unbalanced loops
    pub fn build(opcodes: &[Opcode]) -> QutResult<Self> {
        let mut targets = HashMap::new();
        let mut pending: Vec<usize> = Vec::new();

        for (idx, opcode) in opcodes.iter().enumerate() {
            match opcode {
                Opcode::LoopOpen => pending.push(idx),
                Opcode::LoopClose => {
                    let start = pending
                        .pop()
                        .ok_or(QutError::UnmatchedLoopClose { position: idx })?;
                    targets.insert(start, idx);
                    targets.insert(idx, start);
                }
                _ => {}
            }
        }

        if !pending.is_empty() {
            return Err(QutError::UnmatchedLoopOpen {
                count: pending.len(),
                positions: pending,
            });
        }

        Ok(JumpTable { targets })
    }

    /// Matching position for a loop bracket at `idx`
    pub fn partner(&self, idx: usize) -> Option<usize> {
        self.targets.get(&idx).copied()
    }

    /// Number of entries (two per matched pair)
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Number of matched loop pairs
    pub fn pairs(&self) -> usize {
        self.targets.len() / 2
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.targets.iter().map(|(from, to)| (*from, *to))
    }

    /// Raw mapping, mostly useful for comparisons in tests
    pub fn as_map(&self) -> &HashMap<usize, usize> {
        &self.targets
    }
}
