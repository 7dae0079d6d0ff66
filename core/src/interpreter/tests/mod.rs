//! Tests for the interpreter
//!
//! Organized by pipeline stage

mod helpers;
