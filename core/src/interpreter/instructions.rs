//! Instruction effects
//!
//! One function per opcode (indirect dispatch lives in the execution loop,
//! since it re-enters dispatch). Each returns where execution continues.

use super::errors::{QutError, QutResult};
use super::io::Io;
use super::jump_table::JumpTable;
use super::vm::{Flow, Machine};

/* ===================== Loops ===================== */

/// `qut`: unconditional jump back to the matching loop-open, which re-tests
pub fn loop_close(jumps: &JumpTable, position: usize, depth: usize) -> QutResult<Flow> {
    match jumps.partner(position) {
        Some(open) => Ok(Flow::Jump(open)),
        None if depth > 0 => Err(QutError::DanglingLoopClose { position }),
        None => Err(QutError::UnmatchedLoopClose { position }),
    }
}

/// `QUT`: skip past the matching loop-close when the cell is zero
pub fn loop_open(machine: &Machine, jumps: &JumpTable, position: usize) -> QutResult<Flow> {
    if machine.cell() != 0 {
        return Ok(Flow::Next);
    }

    let close = jumps.partner(position).ok_or(QutError::UnmatchedLoopOpen {
        count: 1,
        positions: vec![position],
    })?;
    Ok(Flow::Jump(close + 1))
}

/* ===================== Pointer ===================== */

pub fn move_left(machine: &mut Machine, position: usize) -> QutResult<Flow> {
    machine.pointer = machine
        .pointer
        .checked_sub(1)
        .ok_or(QutError::BoundsUnderflow { position })?;
    Ok(Flow::Next)
}

pub fn move_right(machine: &mut Machine, position: usize) -> QutResult<Flow> {
    let next = machine.pointer + 1;
    if next >= machine.tape_length() {
        return Err(QutError::BoundsOverflow {
            position,
            tape_length: machine.tape_length(),
        });
    }
    machine.pointer = next;
    Ok(Flow::Next)
}

/* ===================== Cells ===================== */

pub fn decrement(machine: &mut Machine) -> Flow {
    let cell = machine.cell_mut();
    *cell = cell.wrapping_sub(1);
    Flow::Next
}

pub fn increment(machine: &mut Machine) -> Flow {
    let cell = machine.cell_mut();
    *cell = cell.wrapping_add(1);
    Flow::Next
}

pub fn zero_cell(machine: &mut Machine) -> Flow {
    *machine.cell_mut() = 0;
    Flow::Next
}

/// `QQQ`: an empty register loads the cell; a full one stores into it and
/// empties itself
pub fn register_transfer(machine: &mut Machine) -> Flow {
    if machine.register == 0 {
        machine.register = machine.cell();
    } else {
        *machine.cell_mut() = machine.register;
        machine.register = 0;
    }
    Flow::Next
}

/* ===================== I/O ===================== */

/// `Qut`: read into a zero cell, print a non-zero one
pub fn conditional_io(machine: &mut Machine, io: &mut Io<'_>, position: usize) -> QutResult<Flow> {
    if machine.cell() == 0 {
        input(machine, io, position)
    } else {
        output(machine, io, position)
    }
}

pub fn output(machine: &Machine, io: &mut Io<'_>, position: usize) -> QutResult<Flow> {
    io.write_char(machine.cell())
        .map_err(|source| QutError::Io { position, source })?;
    Ok(Flow::Next)
}

pub fn input(machine: &mut Machine, io: &mut Io<'_>, position: usize) -> QutResult<Flow> {
    let byte = io
        .read_byte()
        .map_err(|source| QutError::Io { position, source })?;
    *machine.cell_mut() = i64::from(byte);
    Ok(Flow::Next)
}
