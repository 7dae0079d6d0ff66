//! Character I/O ports
//!
//! Input is consumed one byte per read; output writes one Unicode scalar value
//! per call, UTF-8 encoded, with no line terminator.

use std::io::{self, Read, Write};

/// Byte source and character sink used by a run
pub struct Io<'a> {
    input: &'a mut dyn Read,
    output: &'a mut dyn Write,
}

impl<'a> Io<'a> {
    pub fn new(input: &'a mut dyn Read, output: &'a mut dyn Write) -> Self {
        Io { input, output }
    }

    /// Read exactly one byte
    ///
    /// Pending output is flushed first so prompts appear before the read
    /// blocks. End of input is reported as `UnexpectedEof`.
    pub fn read_byte(&mut self) -> io::Result<u8> {
        self.output.flush()?;
        let mut buf = [0u8; 1];
        self.input.read_exact(&mut buf)?;
        Ok(buf[0])
    }

    /// Write a cell value as one character
    ///
    /// Values that are not Unicode scalar values come out as U+FFFD.
    pub fn write_char(&mut self, value: i64) -> io::Result<()> {
        let ch = u32::try_from(value)
            .ok()
            .and_then(char::from_u32)
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        let mut buf = [0u8; 4];
        self.output.write_all(ch.encode_utf8(&mut buf).as_bytes())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }
}
