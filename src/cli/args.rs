//! CLI argument definitions using clap
//!
//! Commands:
//! - studymatch validate --table <name> [--config <path>]
//! - studymatch load [--config <path>]
//! - studymatch ddl
//! - studymatch catalog

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// studymatch - insert contracts for the campus study-matching schema
#[derive(Parser, Debug)]
#[command(name = "studymatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate insert payloads read from stdin, one JSON object per line
    Validate {
        /// Table the payloads are inserted into
        #[arg(long)]
        table: String,

        /// Path to configuration file
        #[arg(long, default_value = "./studymatch.json")]
        config: PathBuf,
    },

    /// Insert `{"table": ..., "row": {...}}` lines from stdin into an
    /// in-memory store and echo the stored rows
    Load {
        /// Path to configuration file
        #[arg(long, default_value = "./studymatch.json")]
        config: PathBuf,
    },

    /// Print CREATE TABLE statements for every table
    Ddl,

    /// Print the catalog (tables and relations) as JSON
    Catalog,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
