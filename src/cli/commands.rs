//! CLI commands and argument parsing

use crate::source::FILE_DRIVER;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Infer a relational schema from JSON documents
#[derive(Parser, Debug)]
#[command(name = "tosser")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Mapping policy file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub map: Option<PathBuf>,

    /// Working directory for the schema file
    #[arg(short, long, global = true)]
    pub work_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a schema from documents
    Generate {
        /// File path or glob of the documents
        #[arg(short, long)]
        path: String,

        /// Source driver
        #[arg(long, default_value = FILE_DRIVER)]
        driver: String,

        /// Keep widening the existing schema file instead of starting over
        #[arg(long)]
        resume: bool,

        /// Maximum distinct values tracked per enum column
        #[arg(long)]
        enum_max: Option<usize>,

        /// Padding added to observed string lengths
        #[arg(long)]
        length_pad: Option<usize>,
    },

    /// Print a persisted schema
    Show {
        /// Schema file (defaults to the one in the working directory)
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Print the Arrow projection instead of the JSON document
        #[arg(long)]
        arrow: bool,
    },

    /// Validate the mapping policy
    Validate,

    /// List available source drivers
    Drivers,
}
