//! Interactive sessions
//!
//! A session keeps one machine alive across several program texts, the way
//! the REPL runs each input line against the same tape, pointer and register.
//! The instruction pointer always starts at 0 for a new text.

use std::io::{Read, Write};

use crate::config::{Config, ConfigError};
use crate::interpreter::{self, ExecutionResult, Io, Machine, NoTrace, Observer, QutResult, TraceLog};

pub struct Session {
    config: Config,
    machine: Machine,
}

impl Session {
    /// Start a session on a zeroed tape; rejects configs that fail validation
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let machine = Machine::new(config.tape_length);
        Ok(Session { config, machine })
    }

    /// Run one program text against the session's machine
    ///
    /// After a runtime fault the machine keeps the state the fault left it in.
    pub fn execute(
        &mut self,
        source: &str,
        input: &mut dyn Read,
        output: &mut dyn Write,
    ) -> QutResult<ExecutionResult> {
        let mut io = Io::new(input, output);
        let mut observer: Box<dyn Observer> = if self.config.trace {
            Box::new(TraceLog)
        } else {
            Box::new(NoTrace)
        };

        interpreter::execute(
            source,
            &mut self.machine,
            self.config.max_dispatch_depth,
            &mut io,
            observer.as_mut(),
        )
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Discard all state and start again from a zeroed tape
    pub fn reset(&mut self) {
        self.machine = Machine::new(self.config.tape_length);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::QutError;

    fn session() -> Session {
        Session::new(Config::default()).unwrap()
    }

    #[test]
    fn test_state_persists_between_texts() {
        let mut session = session();
        let mut input: &[u8] = b"";
        let mut output = Vec::new();

        session.execute("QuT QuT quT", &mut input, &mut output).unwrap();
        session.execute("QuT", &mut input, &mut output).unwrap();

        let machine = session.machine();
        assert_eq!(machine.tape[0], 2);
        assert_eq!(machine.tape[1], 1);
        assert_eq!(machine.pointer, 1);
    }

    #[test]
    fn test_register_persists_between_texts() {
        let mut session = session();
        let mut input: &[u8] = b"";
        let mut output = Vec::new();

        session.execute("QuT QuT QuT QQQ", &mut input, &mut output).unwrap();
        assert_eq!(session.machine().register, 3);

        session.execute("quT QQQ", &mut input, &mut output).unwrap();
        assert_eq!(session.machine().tape[1], 3);
        assert_eq!(session.machine().register, 0);
    }

    #[test]
    fn test_fault_keeps_partial_state() {
        let mut session = session();
        let mut input: &[u8] = b"";
        let mut output = Vec::new();

        let err = session
            .execute("QuT QuT qUt", &mut input, &mut output)
            .unwrap_err();
        assert!(matches!(err, QutError::BoundsUnderflow { position: 2 }));
        assert_eq!(session.machine().tape[0], 2);
        assert_eq!(session.machine().pointer, 0);
    }

    #[test]
    fn test_compile_error_leaves_state_untouched() {
        let mut session = session();
        let mut input: &[u8] = b"";
        let mut output = Vec::new();

        session.execute("QuT", &mut input, &mut output).unwrap();
        let err = session
            .execute("QuT QuT bogus", &mut input, &mut output)
            .unwrap_err();

        assert!(err.is_structural());
        assert_eq!(session.machine().tape[0], 1);
    }

    #[test]
    fn test_reset_restores_configured_tape() {
        let config = Config {
            tape_length: 3,
            ..Config::default()
        };
        let mut session = Session::new(config).unwrap();
        let mut input: &[u8] = b"";
        let mut output = Vec::new();

        session.execute("quT QuT", &mut input, &mut output).unwrap();
        session.reset();

        assert_eq!(session.machine(), &Machine::new(3));
        assert_eq!(session.config().tape_length, 3);
    }

    #[test]
    fn test_rejects_empty_tape() {
        let config = Config {
            tape_length: 0,
            ..Config::default()
        };
        let Err(err) = Session::new(config) else {
            unreachable!("Expected a zero tape length to be rejected");
        };
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_zero_dispatch_depth() {
        let config = Config {
            max_dispatch_depth: 0,
            ..Config::default()
        };
        assert!(matches!(Session::new(config), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_trace_does_not_change_results() {
        let traced = Config {
            trace: true,
            ..Config::default()
        };
        let source = "Tuq QUT quT QuT qUt QUt qut quT TUQ";

        let mut plain = session();
        let mut input: &[u8] = b"\x03";
        let mut plain_out = Vec::new();
        let plain_result = plain.execute(source, &mut input, &mut plain_out).unwrap();

        let mut with_trace = Session::new(traced).unwrap();
        let mut input: &[u8] = b"\x03";
        let mut traced_out = Vec::new();
        let traced_result = with_trace
            .execute(source, &mut input, &mut traced_out)
            .unwrap();

        assert_eq!(plain_result, traced_result);
        assert_eq!(plain_out, traced_out);
        assert_eq!(traced_result.machine.tape[1], 3);
        assert_eq!(traced_out, "\u{3}".as_bytes());
    }
}
