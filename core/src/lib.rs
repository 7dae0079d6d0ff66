//! # qut-core
//!
//! Interpreter, configuration and front end for the QUT tape language.

pub mod cli;
pub mod config;
pub mod interpreter;
pub mod session;

// Re-export main types
pub use crate::config::{Config, ConfigError};
pub use crate::interpreter::{run, ExecutionResult, Machine, Opcode, Program, QutError};
pub use crate::session::Session;
