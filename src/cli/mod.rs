//! CLI module for studymatch
//!
//! Provides command-line interface for:
//! - validate: Check insert payloads against one table
//! - load: Insert rows into an in-memory store
//! - ddl: Print CREATE TABLE statements
//! - catalog: Print the catalog as JSON

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    catalog, ddl, load, load_stream, run, run_command, validate, validate_stream, StreamSummary,
};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_requests, write_error, write_response, write_text, Request};
