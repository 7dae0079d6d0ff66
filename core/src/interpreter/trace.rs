//! Diagnostics hooks
//!
//! Observers see tokenization and every executed step. They only get shared
//! references, so tracing can never change what a program does.

use super::opcode::Opcode;
use super::vm::VM;

/// Hook points called by the tokenizer and the execution loop
pub trait Observer {
    /// A token was mapped to an opcode
    fn on_token(&mut self, _index: usize, _token: &str, _opcode: Opcode) {}

    /// An instruction is about to run
    fn before_step(&mut self, _ip: usize, _opcode: Opcode) {}

    /// An instruction finished; `vm.ip` already points at the next one
    fn after_step(&mut self, _vm: &VM) {}
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrace;

impl Observer for NoTrace {}

/// Emits `tracing` debug events on the `qut::trace` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TraceLog;

impl Observer for TraceLog {
    fn on_token(&mut self, index: usize, token: &str, opcode: Opcode) {
        tracing::debug!(target: "qut::trace", index, token, opcode = opcode.value(), "tokenized");
    }

    fn before_step(&mut self, ip: usize, opcode: Opcode) {
        tracing::debug!(target: "qut::trace", ip, %opcode, "step");
    }

    fn after_step(&mut self, vm: &VM) {
        tracing::debug!(
            target: "qut::trace",
            tape = ?vm.machine.tape,
            pointer = vm.machine.pointer,
            register = vm.machine.register,
            ip = vm.ip,
            "state"
        );
    }
}
