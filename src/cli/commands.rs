//! CLI command implementations
//!
//! Commands read JSON lines from stdin and answer each line on stdout.
//! A rejected payload produces an error response, never a process failure.
//! Only configuration, catalog and stream errors end the process.

use std::io::{self, BufRead, Write};
use std::path::Path;

use serde_json::Value;

use crate::observability::{log_event_with_fields, Event, Logger};
use crate::schema::{catalog_ddl, Catalog, InsertValidator, TableDef, ValidationOptions};
use crate::store::{MemoryStore, StoreError};

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliErrorCode, CliResult};
use super::io::{read_requests, write_error, write_response, write_text};

/// Counts of answered lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub accepted: usize,
    pub rejected: usize,
}

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Validate { table, config } => validate(&table, &config).map(|_| ()),
        Command::Load { config } => load(&config).map(|_| ()),
        Command::Ddl => ddl(),
        Command::Catalog => catalog(),
    }
}

/// Validate stdin payloads against one table
pub fn validate(table: &str, config_path: &Path) -> CliResult<StreamSummary> {
    let config = load_config(config_path)?;
    let options = config.validation_options()?;
    let catalog = load_catalog()?;
    let table = catalog.table(table)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    validate_stream(table, options, stdin.lock(), &mut stdout.lock())
}

/// Answer every payload line in `input` with a validation verdict.
pub fn validate_stream<R: BufRead, W: Write>(
    table: &TableDef,
    options: ValidationOptions,
    input: R,
    output: &mut W,
) -> CliResult<StreamSummary> {
    let validator = InsertValidator::with_options(table, options);
    let mut summary = StreamSummary::default();

    for request in read_requests(input) {
        let payload = match request? {
            Ok(payload) => payload,
            Err(reason) => {
                write_unparseable(output, &reason)?;
                summary.rejected += 1;
                continue;
            }
        };

        match validator.validate(&payload) {
            Ok(accepted) => {
                log_event_with_fields(Event::InsertValidated, &[("table", &table.name)]);
                write_response(output, &accepted)?;
                summary.accepted += 1;
            }
            Err(e) => {
                let fields = e.fields().join(",");
                log_event_with_fields(
                    Event::InsertRejected,
                    &[("table", &table.name), ("fields", &fields)],
                );
                write_error(output, e.code().code(), e.message(), e.details())?;
                summary.rejected += 1;
            }
        }
    }

    Ok(summary)
}

/// Insert stdin rows into a fresh in-memory store
pub fn load(config_path: &Path) -> CliResult<StreamSummary> {
    let config = load_config(config_path)?;
    let options = config.validation_options()?;
    let store = MemoryStore::new(load_catalog()?).with_options(options);

    let stdin = io::stdin();
    let stdout = io::stdout();
    load_stream(&store, stdin.lock(), &mut stdout.lock())
}

/// Insert every `{"table": ..., "row": {...}}` line of `input` into `store`.
///
/// Rows are applied in input order, so a later line may reference an id
/// assigned to an earlier one.
pub fn load_stream<R: BufRead, W: Write>(
    store: &MemoryStore,
    input: R,
    output: &mut W,
) -> CliResult<StreamSummary> {
    let mut summary = StreamSummary::default();

    for request in read_requests(input) {
        let request = match request? {
            Ok(request) => request,
            Err(reason) => {
                write_unparseable(output, &reason)?;
                summary.rejected += 1;
                continue;
            }
        };

        let table = request.get("table").and_then(Value::as_str);
        let (table, row) = match (table, request.get("row")) {
            (Some(table), Some(row)) => (table, row),
            _ => {
                write_error(
                    output,
                    CliErrorCode::IoError.code(),
                    "Expected {\"table\": <name>, \"row\": <object>}",
                    &[],
                )?;
                summary.rejected += 1;
                continue;
            }
        };

        match store.insert_json(table, row) {
            Ok(stored) => {
                write_response(output, &stored)?;
                summary.accepted += 1;
            }
            Err(StoreError::Rejected(e)) => {
                write_error(output, e.code().code(), e.message(), e.details())?;
                summary.rejected += 1;
            }
            Err(e) if e.is_client_error() => {
                write_error(output, e.code(), &e.to_string(), &[])?;
                summary.rejected += 1;
            }
            Err(e) => return Err(CliError::from(e)),
        }
    }

    Ok(summary)
}

/// Print CREATE TABLE statements
pub fn ddl() -> CliResult<()> {
    let catalog = load_catalog()?;
    let sql = catalog_ddl(&catalog);

    let count = catalog.table_count().to_string();
    log_event_with_fields(Event::DdlRendered, &[("tables", &count)]);

    write_text(&mut io::stdout().lock(), &sql)
}

/// Print the catalog as JSON
pub fn catalog() -> CliResult<()> {
    let catalog = load_catalog()?;
    let json = catalog.to_json_pretty()?;
    write_text(&mut io::stdout().lock(), &json)
}

fn load_config(path: &Path) -> CliResult<Config> {
    let config = Config::load(path)?;
    Logger::set_min_severity(config.log_severity()?);

    let path_str = path.display().to_string();
    log_event_with_fields(Event::ConfigLoaded, &[("path", &path_str)]);
    Ok(config)
}

fn load_catalog() -> CliResult<Catalog> {
    match Catalog::standard() {
        Ok(catalog) => {
            let count = catalog.table_count().to_string();
            log_event_with_fields(Event::CatalogLoaded, &[("tables", &count)]);
            Ok(catalog)
        }
        Err(e) => {
            let message = e.to_string();
            log_event_with_fields(Event::CatalogInvalid, &[("error", &message)]);
            Err(CliError::from(e))
        }
    }
}

fn write_unparseable<W: Write>(output: &mut W, reason: &str) -> CliResult<()> {
    write_error(output, CliErrorCode::IoError.code(), reason, &[])
}
