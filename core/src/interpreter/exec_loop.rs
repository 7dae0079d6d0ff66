//! Core execution loop
//!
//! ## Function Organization
//! 1. run_until_done() - Top-level driver (calls step repeatedly)
//! 2. step() - Executes the instruction at `vm.ip`
//! 3. dispatch() - Single-opcode transition, re-entered by indirect dispatch

use super::errors::{QutError, QutResult};
use super::instructions;
use super::io::Io;
use super::opcode::Opcode;
use super::program::Program;
use super::trace::Observer;
use super::vm::{Flow, Step, VM};

/* ===================== Public API ===================== */

/// Run the VM until the instruction pointer leaves the program
///
/// Output is flushed whether the run succeeds or fails, so everything the
/// program printed before a fault is visible.
pub fn run_until_done(
    vm: &mut VM,
    program: &Program,
    io: &mut Io<'_>,
    observer: &mut dyn Observer,
) -> QutResult<()> {
    let outcome = drive(vm, program, io, observer);
    let flushed = io.flush();

    outcome?;
    flushed.map_err(|source| QutError::Io {
        position: vm.ip,
        source,
    })
}

fn drive(
    vm: &mut VM,
    program: &Program,
    io: &mut Io<'_>,
    observer: &mut dyn Observer,
) -> QutResult<()> {
    loop {
        match step(vm, program, io, observer)? {
            Step::Continue => continue,
            Step::Done => return Ok(()),
        }
    }
}

/// Execute one instruction
///
/// Returns `Step::Done` without doing anything once `vm.ip` is past the last
/// instruction. On error `vm.ip` still points at the faulting instruction.
/// A VM whose pointer is off the tape or whose dispatch limit is 0 is rejected
/// before the instruction runs.
pub fn step(
    vm: &mut VM,
    program: &Program,
    io: &mut Io<'_>,
    observer: &mut dyn Observer,
) -> QutResult<Step> {
    let position = vm.ip;
    let Some(opcode) = program.get(position) else {
        return Ok(Step::Done);
    };

    vm.check()?;
    observer.before_step(position, opcode);

    let flow = dispatch(vm, program, io, opcode, position, 0)?;
    vm.ip = match flow {
        Flow::Next => position + 1,
        Flow::Jump(target) => target,
    };
    vm.steps += 1;

    observer.after_step(vm);

    Ok(Step::Continue)
}

/// Apply one opcode to the VM as if it sat at `position`
///
/// `depth` counts nested indirect dispatches; the top-level call uses 0.
pub fn dispatch(
    vm: &mut VM,
    program: &Program,
    io: &mut Io<'_>,
    opcode: Opcode,
    position: usize,
    depth: usize,
) -> QutResult<Flow> {
    let machine = &mut vm.machine;

    match opcode {
        Opcode::LoopClose => instructions::loop_close(program.jumps(), position, depth),
        Opcode::MoveLeft => instructions::move_left(machine, position),
        Opcode::MoveRight => instructions::move_right(machine, position),
        Opcode::IndirectDispatch => indirect_dispatch(vm, program, io, position, depth),
        Opcode::ConditionalIo => instructions::conditional_io(machine, io, position),
        Opcode::Decrement => Ok(instructions::decrement(machine)),
        Opcode::Increment => Ok(instructions::increment(machine)),
        Opcode::LoopOpen => instructions::loop_open(machine, program.jumps(), position),
        Opcode::ZeroCell => Ok(instructions::zero_cell(machine)),
        Opcode::RegisterTransfer => Ok(instructions::register_transfer(machine)),
        Opcode::Output => instructions::output(machine, io, position),
        Opcode::Input => instructions::input(machine, io, position),
    }
}

/* ===================== Indirect Dispatch ===================== */

/// `qUT`: execute the opcode whose value is in the current cell
fn indirect_dispatch(
    vm: &mut VM,
    program: &Program,
    io: &mut Io<'_>,
    position: usize,
    depth: usize,
) -> QutResult<Flow> {
    let value = vm.machine.cell();

    if value == Opcode::IndirectDispatch.value() || depth >= vm.max_dispatch_depth {
        return Err(QutError::RecursionGuard { position, depth });
    }

    let target = Opcode::from_value(value).ok_or(QutError::UndefinedOpcode { value, position })?;

    tracing::trace!(position, depth, opcode = %target, "indirect dispatch");
    dispatch(vm, program, io, target, position, depth + 1)
}
