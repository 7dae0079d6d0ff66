//! Opcode definitions
//!
//! Every QUT mnemonic maps to exactly one of twelve opcodes. The numeric
//! values matter: indirect dispatch reads a tape cell and executes the opcode
//! with that value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of QUT instructions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Opcode {
    /// `qut` - jump back to the matching loop-open
    LoopClose = 0,
    /// `qUt` - move the pointer one cell left
    MoveLeft = 1,
    /// `quT` - move the pointer one cell right
    MoveRight = 2,
    /// `qUT` - execute the opcode stored in the current cell
    IndirectDispatch = 3,
    /// `Qut` - read into an empty cell, otherwise print it
    ConditionalIo = 4,
    /// `QUt`
    Decrement = 5,
    /// `QuT`
    Increment = 6,
    /// `QUT` - skip past the matching loop-close when the cell is zero
    LoopOpen = 7,
    /// `UUU`
    ZeroCell = 8,
    /// `QQQ` - load/store toggle between the cell and the register
    RegisterTransfer = 9,
    /// `TUQ`
    Output = 10,
    /// `Tuq`
    Input = 11,
}

/// Mnemonics indexed by opcode value
const MNEMONICS: [&str; 12] = [
    "qut", "qUt", "quT", "qUT", "Qut", "QUt", "QuT", "QUT", "UUU", "QQQ", "TUQ", "Tuq",
];

const OPCODES: [Opcode; 12] = [
    Opcode::LoopClose,
    Opcode::MoveLeft,
    Opcode::MoveRight,
    Opcode::IndirectDispatch,
    Opcode::ConditionalIo,
    Opcode::Decrement,
    Opcode::Increment,
    Opcode::LoopOpen,
    Opcode::ZeroCell,
    Opcode::RegisterTransfer,
    Opcode::Output,
    Opcode::Input,
];

impl Opcode {
    /// All opcodes in value order
    pub const ALL: [Opcode; 12] = OPCODES;

    /// Look up a mnemonic. Matching is exact: no case folding, no prefixes.
    pub fn from_mnemonic(token: &str) -> Option<Opcode> {
        MNEMONICS
            .iter()
            .position(|m| *m == token)
            .map(|idx| OPCODES[idx])
    }

    /// Decode a numeric value read from the tape
    pub fn from_value(value: i64) -> Option<Opcode> {
        usize::try_from(value)
            .ok()
            .and_then(|idx| OPCODES.get(idx).copied())
    }

    pub fn mnemonic(self) -> &'static str {
        MNEMONICS[self as usize]
    }

    pub fn value(self) -> i64 {
        self as i64
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.mnemonic(), self.value())
    }
}
