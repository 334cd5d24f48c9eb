// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Tosser
//!
//! Infers a normalized relational schema (tables, columns, types) from
//! semi-structured JSON documents.
//!
//! ## Features
//!
//! - **Structural naming**: table and column names derived from document
//!   position, with nested objects flattened and arrays split into tables
//! - **Incremental typing**: column types widen across documents, with enum
//!   and length hints, without re-scanning earlier data
//! - **Mapping policies**: YAML/JSON policy files with `@include` globs,
//!   table aliases, column overrides and `keep`/`ignore`/`values` directives
//! - **Versioned schema files**: write, reload and resume generation
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tosser::{load_map, FileSource, FileSourceConfig, Ingest, TosserSchema, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let policy = load_map("map.yaml")?;
//!     let mut schema = TosserSchema::new(policy);
//!
//!     let source = FileSource::new(FileSourceConfig::new("data/**/*.json"));
//!     let report = Ingest::new().generate(&mut schema, &source).await?;
//!     println!("{report}");
//!
//!     schema.write(".").await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Source ──▶ Ingest ──▶ TosserSchema::contribute ──▶ write()  │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//!        ┌──────────────┬───────┴──────┬────────────────┐
//!        │  Traverser   │   Resolver   │   Inferencer   │
//!        ├──────────────┼──────────────┼────────────────┤
//!        │ Trail/leaves │ TosserMap    │ TypeVar widen  │
//!        │ stack based  │ aliases      │ enum / length  │
//!        └──────────────┴──────────────┴────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Runtime settings
pub mod settings;

/// Ingested documents
pub mod document;

/// Document tree traversal
pub mod traverse;

/// Schema model, type inference and persistence
pub mod schema;

/// Mapping policy
pub mod mapping;

/// Trail to table/column resolution
pub mod resolve;

/// `@include` config merging
pub mod include;

/// Document sources
pub mod source;

/// Generation orchestrator
pub mod ingest;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use document::Document;
pub use ingest::{Ingest, IngestReport, IngestState};
pub use mapping::{load_map, load_map_from_str, TosserMap};
pub use schema::{InferenceOptions, SchemaColumn, SchemaTable, SchemaType, TosserSchema, TypeVar};
pub use settings::{Settings, SettingsArgs};
pub use source::{FileSource, FileSourceConfig, MemorySource, Source, SourceRegistry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
