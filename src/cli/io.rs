//! JSON-lines I/O for the CLI
//!
//! - Input: one JSON request per line; blank lines are skipped
//! - Output: one JSON object per line, flushed after each
//! - UTF-8 only

use std::io::{BufRead, Write};

use serde_json::Value;

use super::errors::{CliError, CliResult};

/// Request lines from `input`, blank lines dropped.
pub fn read_requests<R: BufRead>(input: R) -> impl Iterator<Item = CliResult<String>> {
    input
        .lines()
        .map(|line| line.map_err(CliError::from))
        .filter(|line| !matches!(line, Ok(l) if l.trim().is_empty()))
}

/// Write a success envelope around `data`.
pub fn write_response<W: Write>(out: &mut W, data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });
    serde_json::to_writer(&mut *out, &response)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Write an error envelope.
pub fn write_error<W: Write>(out: &mut W, code: &str, message: &str) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "error",
        "code": code,
        "message": message
    });
    serde_json::to_writer(&mut *out, &response)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Write an already encoded JSON line.
pub fn write_json<W: Write>(out: &mut W, json_str: &str) -> CliResult<()> {
    writeln!(out, "{}", json_str)?;
    out.flush()?;
    Ok(())
}
