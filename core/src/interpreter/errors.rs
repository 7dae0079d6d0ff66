//! Interpreter error types
//!
//! Every failure is fatal for the run that raised it. Variants carry the
//! offending token or value and its position so a front end can render a
//! diagnostic without access to the program text.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QutError {
    /// The grammar could not split the program text
    #[error("program text could not be split into tokens: {0}")]
    Syntax(String),

    #[error("instruction {token} is not defined! position {position} (line {line}, column {column})")]
    UnknownInstruction {
        token: String,
        position: usize,
        line: usize,
        column: usize,
    },

    #[error("unmatched qut at instruction {position}")]
    UnmatchedLoopClose { position: usize },

    /// Loop-close executed through indirect dispatch, where the dispatching
    /// position has no partner in the jump table
    #[error("qut dispatched at instruction {position} has no matching QUT")]
    DanglingLoopClose { position: usize },

    #[error("{count} unmatched QUT(s) at instructions {positions:?}")]
    UnmatchedLoopOpen { count: usize, positions: Vec<usize> },

    #[error("tape pointer moved before memory start at instruction {position}")]
    BoundsUnderflow { position: usize },

    #[error("tape pointer moved beyond memory range ({tape_length} cells) at instruction {position}")]
    BoundsOverflow { position: usize, tape_length: usize },

    #[error("infinite loop detected! instruction {position} (dispatch depth {depth})")]
    RecursionGuard { position: usize, depth: usize },

    #[error("undefined instruction {value} at position {position}")]
    UndefinedOpcode { value: i64, position: usize },

    /// The machine handed to a run does not satisfy `pointer < tape.len()`
    #[error("pointer {pointer} is outside the tape ({tape_length} cells)")]
    InvalidMachine { pointer: usize, tape_length: usize },

    #[error("dispatch depth limit must be at least 1")]
    ZeroDispatchDepth,

    #[error("i/o failure at instruction {position}: {source}")]
    Io {
        position: usize,
        #[source]
        source: std::io::Error,
    },
}

impl QutError {
    /// Token or instruction index the error refers to, if any
    pub fn position(&self) -> Option<usize> {
        match self {
            QutError::Syntax(_)
            | QutError::UnmatchedLoopOpen { .. }
            | QutError::InvalidMachine { .. }
            | QutError::ZeroDispatchDepth => None,
            QutError::UnknownInstruction { position, .. }
            | QutError::UnmatchedLoopClose { position }
            | QutError::DanglingLoopClose { position }
            | QutError::BoundsUnderflow { position }
            | QutError::BoundsOverflow { position, .. }
            | QutError::RecursionGuard { position, .. }
            | QutError::UndefinedOpcode { position, .. }
            | QutError::Io { position, .. } => Some(*position),
        }
    }

    /// True for errors raised before any instruction runs
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            QutError::Syntax(_)
                | QutError::UnknownInstruction { .. }
                | QutError::UnmatchedLoopClose { .. }
                | QutError::UnmatchedLoopOpen { .. }
        )
    }
}

pub type QutResult<T> = Result<T, QutError>;
