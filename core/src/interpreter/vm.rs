//! Virtual Machine state
//!
//! The machine state (tape, pointer, register) can outlive a single run, so an
//! interactive front end can keep it between commands. The VM wraps it with
//! the per-run instruction pointer and counters.

use serde::{Deserialize, Serialize};

use super::errors::{QutError, QutResult};

/* ===================== Machine ===================== */

/// Tape, pointer and transfer register
///
/// A runnable machine has `pointer < tape.len()`; `step` refuses anything else
/// through [`Machine::check`]. A register value of 0 means "empty".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    pub tape: Vec<i64>,
    pub pointer: usize,
    pub register: i64,
}

impl Machine {
    /// Zeroed tape of `tape_length` cells, pointer at 0, register empty
    pub fn new(tape_length: usize) -> Self {
        Machine {
            tape: vec![0; tape_length],
            pointer: 0,
            register: 0,
        }
    }

    /// Value of the cell under the pointer
    pub fn cell(&self) -> i64 {
        self.tape[self.pointer]
    }

    pub fn cell_mut(&mut self) -> &mut i64 {
        &mut self.tape[self.pointer]
    }

    pub fn tape_length(&self) -> usize {
        self.tape.len()
    }

    /// Fails if the pointer is off the tape (always the case for an empty one)
    pub fn check(&self) -> QutResult<()> {
        if self.pointer < self.tape.len() {
            Ok(())
        } else {
            Err(QutError::InvalidMachine {
                pointer: self.pointer,
                tape_length: self.tape.len(),
            })
        }
    }
}

/* ===================== VM ===================== */

/// State of one program run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VM {
    pub machine: Machine,

    /// Index of the next instruction to execute
    pub ip: usize,

    /// Instructions executed so far (indirect dispatch counts once)
    pub steps: u64,

    /// Nesting limit for indirect dispatch
    pub max_dispatch_depth: usize,
}

impl VM {
    pub fn new(tape_length: usize, max_dispatch_depth: usize) -> Self {
        VM::with_machine(Machine::new(tape_length), max_dispatch_depth)
    }

    /// Start a run on an existing machine state
    pub fn with_machine(machine: Machine, max_dispatch_depth: usize) -> Self {
        VM {
            machine,
            ip: 0,
            steps: 0,
            max_dispatch_depth,
        }
    }

    /// Hand the machine state back, dropping the per-run state
    pub fn into_machine(self) -> Machine {
        self.machine
    }

    /// Fails unless the machine and the dispatch limit can run a program
    pub fn check(&self) -> QutResult<()> {
        if self.max_dispatch_depth == 0 {
            return Err(QutError::ZeroDispatchDepth);
        }
        self.machine.check()
    }
}

/* ===================== Step Result ===================== */

/// Result of executing one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Continue to next step
    Continue,
    /// Instruction pointer reached the end of the program
    Done,
}

/// Where execution goes after an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Advance to the following instruction
    Next,
    /// Continue at the given instruction
    Jump(usize),
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub machine: Machine,
    pub steps: u64,
}
