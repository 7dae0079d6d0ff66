//! Compiled programs
//!
//! A `Program` is the immutable input to the executor: the opcode list plus
//! its jump table. Both are derived once from the source text.

use super::errors::QutResult;
use super::jump_table::JumpTable;
use super::opcode::Opcode;
use super::tokenizer;
use super::trace::{NoTrace, Observer};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    opcodes: Vec<Opcode>,
    jumps: JumpTable,
}

impl Program {
    /// Tokenize source text and build the jump table
    pub fn compile(source: &str) -> QutResult<Self> {
        Program::compile_observed(source, &mut NoTrace)
    }

    /// Same as [`Program::compile`], reporting each token to `observer`
    pub fn compile_observed(source: &str, observer: &mut dyn Observer) -> QutResult<Self> {
        let opcodes = tokenizer::to_opcodes(source, observer)?;
        Program::from_opcodes(opcodes)
    }

    pub fn from_opcodes(opcodes: Vec<Opcode>) -> QutResult<Self> {
        let jumps = JumpTable::build(&opcodes)?;
        Ok(Program { opcodes, jumps })
    }

    pub fn get(&self, idx: usize) -> Option<Opcode> {
        self.opcodes.get(idx).copied()
    }

    pub fn opcodes(&self) -> &[Opcode] {
        &self.opcodes
    }

    pub fn jumps(&self) -> &JumpTable {
        &self.jumps
    }

    pub fn len(&self) -> usize {
        self.opcodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opcodes.is_empty()
    }
}
