//! Command output
//!
//! Every command prints exactly one JSON line: `{"status":"ok","data":...}`
//! on success or `{"status":"error","code":...,"message":...}` on failure,
//! including failures to open the store or config. Logs go to stderr.

use std::io::Write;

use serde_json::{json, Value};

use super::errors::CliResult;

/// Write a success response line
pub fn write_response(out: &mut impl Write, data: Value) -> CliResult<()> {
    write_line(out, &json!({ "status": "ok", "data": data }))
}

/// Write an error response line
pub fn write_error(out: &mut impl Write, code: &str, message: &str) -> CliResult<()> {
    write_line(
        out,
        &json!({ "status": "error", "code": code, "message": message }),
    )
}

fn write_line(out: &mut impl Write, response: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *out, response)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
