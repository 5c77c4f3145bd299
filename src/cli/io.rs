//! JSON-lines I/O for the CLI
//!
//! - Input: one JSON value per line, blank lines ignored
//! - Output: one JSON response object per line
//! - UTF-8 only

use std::io::{BufRead, Write};

use serde::Serialize;
use serde_json::{json, Value};

use super::errors::{CliError, CliResult};
use crate::schema::ValidationDetails;

/// One input line: a parsed value, or why the line could not be used
pub type Request = Result<Value, String>;

/// Streaming reader over JSON lines.
///
/// Yields `Err` only when the stream itself cannot be read. A line that is
/// not UTF-8 or not JSON comes out as `Ok(Err(reason))` so the caller can
/// answer it and move on.
pub struct Requests<R> {
    input: R,
    buf: Vec<u8>,
}

/// Reads requests line by line
pub fn read_requests<R: BufRead>(input: R) -> Requests<R> {
    Requests {
        input,
        buf: Vec::new(),
    }
}

impl<R: BufRead> Iterator for Requests<R> {
    type Item = CliResult<Request>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.input.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(CliError::from(e))),
            }

            let line = match std::str::from_utf8(&self.buf) {
                Ok(line) => line.trim(),
                Err(e) => return Some(Ok(Err(format!("Invalid UTF-8: {}", e)))),
            };
            if line.is_empty() {
                continue;
            }
            return Some(Ok(serde_json::from_str(line).map_err(|e| format!("JSON error: {}", e))));
        }
    }
}

/// Write a success response
pub fn write_response<W: Write, T: Serialize>(output: &mut W, data: &T) -> CliResult<()> {
    let response = json!({
        "status": "ok",
        "data": data
    });
    write_line(output, &response)
}

/// Write an error response
pub fn write_error<W: Write>(
    output: &mut W,
    code: &str,
    message: &str,
    details: &[ValidationDetails],
) -> CliResult<()> {
    let response = json!({
        "status": "error",
        "code": code,
        "message": message,
        "details": details
    });
    write_line(output, &response)
}

/// Write raw text followed by a newline
pub fn write_text<W: Write>(output: &mut W, text: &str) -> CliResult<()> {
    writeln!(output, "{}", text)?;
    output.flush()?;
    Ok(())
}

fn write_line<W: Write>(output: &mut W, value: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *output, value)?;
    writeln!(output)?;
    output.flush()?;
    Ok(())
}
