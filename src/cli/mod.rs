//! CLI module
//!
//! Command-line interface for generating schemas.
//!
//! # Commands
//!
//! - `generate` - Fold documents from a source into a schema file
//! - `show` - Print a schema file or its Arrow projection
//! - `validate` - Check a mapping policy
//! - `drivers` - List source drivers

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
