//! # QUT Interpreter
//!
//! Direct interpreter for QUT programs: whitespace-separated mnemonics, each
//! one of twelve opcodes acting on a fixed-size tape, a pointer and a single
//! transfer register.
//!
//! Data flows one way:
//! source text → tokens → opcodes → jump table → execution loop.
//!
//! ```
//! use qut_core::interpreter;
//!
//! let mut input: &[u8] = b"A";
//! let mut output = Vec::new();
//! interpreter::run("Qut TUQ", &mut input, &mut output).unwrap();
//! assert_eq!(output, b"A");
//! ```

pub mod errors;
pub mod exec_loop;
pub mod instructions;
pub mod io;
pub mod jump_table;
pub mod opcode;
pub mod program;
pub mod tokenizer;
pub mod trace;
pub mod vm;

#[cfg(test)]
mod tests;

use std::io::{Read, Write};

// Re-export commonly used items
pub use errors::{QutError, QutResult};
pub use exec_loop::{dispatch, run_until_done, step};
pub use io::Io;
pub use jump_table::JumpTable;
pub use opcode::Opcode;
pub use program::Program;
pub use trace::{NoTrace, Observer, TraceLog};
pub use vm::{ExecutionResult, Flow, Machine, Step, VM};

/// Tape length used when nothing else is configured
pub const DEFAULT_TAPE_LENGTH: usize = 10;

/// Indirect dispatch nesting limit used when nothing else is configured
pub const DEFAULT_MAX_DISPATCH_DEPTH: usize = 8;

/// Compile and run a program on a fresh default machine
pub fn run(source: &str, input: &mut dyn Read, output: &mut dyn Write) -> QutResult<ExecutionResult> {
    let mut machine = Machine::new(DEFAULT_TAPE_LENGTH);
    execute(
        source,
        &mut machine,
        DEFAULT_MAX_DISPATCH_DEPTH,
        &mut Io::new(input, output),
        &mut NoTrace,
    )
}

/// Compile `source` and run it against an existing machine state
///
/// Compilation errors are reported before any instruction runs and leave
/// `machine` untouched. Once execution starts, `machine` is updated to the
/// state the run reached, including when it stops on a fault.
pub fn execute(
    source: &str,
    machine: &mut Machine,
    max_dispatch_depth: usize,
    io: &mut Io<'_>,
    observer: &mut dyn Observer,
) -> QutResult<ExecutionResult> {
    let program = Program::compile_observed(source, observer)?;
    let mut vm = VM::with_machine(machine.clone(), max_dispatch_depth);

    let outcome = run_until_done(&mut vm, &program, io, observer);
    let steps = vm.steps;
    *machine = vm.into_machine();
    outcome?;

    Ok(ExecutionResult {
        machine: machine.clone(),
        steps,
    })
}
