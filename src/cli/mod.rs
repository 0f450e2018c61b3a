//! CLI module for rabbitry
//!
//! Provides command-line interface for:
//! - init: Create an empty data file
//! - serve: Boot and answer JSON-lines requests on stdin/stdout
//! - report: Print one herd report

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, ReportKind};
pub use commands::{init, report, report_with, run, run_command, serve, serve_with, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_requests, write_error, write_json, write_response};
