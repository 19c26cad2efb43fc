//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// wireclient CLI
#[derive(Parser, Debug)]
#[command(name = "wireclient")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client definition file (YAML)
    #[arg(short, long, global = true)]
    pub definition: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a client definition
    Validate,

    /// List the types registered by a definition
    Schemas,

    /// Invoke one operation
    Call {
        /// Resource name
        resource: String,

        /// Operation name (get, list, create, ...)
        operation: String,

        /// Path parameter, key=value (repeatable)
        #[arg(short = 'P', long = "param")]
        params: Vec<String>,

        /// Extra header, key=value (repeatable)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Extra query parameter, key=value (repeatable)
        #[arg(short = 'Q', long = "query")]
        query: Vec<String>,

        /// Inline JSON request body
        #[arg(long)]
        body_json: Option<String>,

        /// Print the undecoded response instead of the typed model
        #[arg(long)]
        raw: bool,
    },

    /// Drain a paginated list operation
    List {
        /// Resource name
        resource: String,

        /// Path parameter, key=value (repeatable)
        #[arg(short = 'P', long = "param")]
        params: Vec<String>,

        /// Extra query parameter, key=value (repeatable)
        #[arg(short = 'Q', long = "query")]
        query: Vec<String>,

        /// Stop after this many pages
        #[arg(long)]
        max_pages: Option<u32>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON (one record per line)
    Json,
    /// Human-readable, indented JSON
    Pretty,
}
