//! Test helpers for interpreter tests
//!
//! Common utilities for compiling programs and running them against in-memory
//! I/O.

use crate::interpreter::{
    execute, ExecutionResult, Io, Machine, NoTrace, Observer, Opcode, Program, QutResult, VM,
    DEFAULT_MAX_DISPATCH_DEPTH, DEFAULT_TAPE_LENGTH,
};

/// Compile a token list, panicking on compile errors
pub fn compile(tokens: &[&str]) -> Program {
    Program::compile(&tokens.join(" ")).expect("Compile failed")
}

/// Run source text on a fresh default machine
///
/// # Returns
/// The run's result and everything written to the output port, even when the
/// run failed.
pub fn run_program(source: &str, input: &[u8]) -> (QutResult<ExecutionResult>, Vec<u8>) {
    let mut machine = Machine::new(DEFAULT_TAPE_LENGTH);
    run_on_machine(source, &mut machine, input)
}

pub fn run_on_machine(
    source: &str,
    machine: &mut Machine,
    input: &[u8],
) -> (QutResult<ExecutionResult>, Vec<u8>) {
    let mut input = input;
    let mut output = Vec::new();
    let result = {
        let mut io = Io::new(&mut input, &mut output);
        execute(
            source,
            machine,
            DEFAULT_MAX_DISPATCH_DEPTH,
            &mut io,
            &mut NoTrace,
        )
    };
    (result, output)
}

/// Default VM whose first cell holds `value`
pub fn vm_with_cell(value: i64) -> VM {
    let mut vm = VM::new(DEFAULT_TAPE_LENGTH, DEFAULT_MAX_DISPATCH_DEPTH);
    vm.machine.tape[0] = value;
    vm
}

/// Observer that records every hook call
#[derive(Debug, Default)]
pub struct Recorder {
    pub tokens: Vec<(usize, String, Opcode)>,
    pub steps: Vec<(usize, Opcode)>,
    pub states: Vec<(Machine, usize)>,
}

impl Observer for Recorder {
    fn on_token(&mut self, index: usize, token: &str, opcode: Opcode) {
        self.tokens.push((index, token.to_string(), opcode));
    }

    fn before_step(&mut self, ip: usize, opcode: Opcode) {
        self.steps.push((ip, opcode));
    }

    fn after_step(&mut self, vm: &VM) {
        self.states.push((vm.machine.clone(), vm.ip));
    }
}
