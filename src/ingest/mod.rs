//! Ingest module
//!
//! Runs a generation session over a document source.
//!
//! # Overview
//!
//! - `Ingest` - pulls documents from a `Source` into a `TosserSchema`
//! - `IngestState` - `idle → reading ⇄ generating → done`
//! - `IngestReport` - counts and timing of a run

mod orchestrator;
mod types;

pub use orchestrator::Ingest;
pub use types::{IngestReport, IngestState};
