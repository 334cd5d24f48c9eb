//! Document sources
//!
//! Sources produce the documents folded into a schema.
//!
//! # Overview
//!
//! - `Source` - async trait yielding a `DocumentStream`
//! - `FileSource` - JSON / JSONL files matched by a path or glob
//! - `MemorySource` - pre-built documents
//! - `SourceRegistry` - driver key to factory map

mod file;
mod memory;
mod registry;
mod types;

pub use file::{FileSource, FileSourceConfig};
pub use memory::MemorySource;
pub use registry::{SourceFactory, SourceRegistry};
pub use types::{DocumentStream, Source, FILE_DRIVER, MEMORY_DRIVER};
