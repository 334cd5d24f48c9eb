//! Config include module
//!
//! Merges a configuration spread over several YAML/JSON files into one
//! tree. Any mapping may carry an `@include` key naming glob patterns:
//!
//! ```yaml
//! defaults:
//!   schema: shop
//! '@include':
//!   - tables/*.yaml
//! ```
//!
//! Include chains that lead back to a file already being expanded are
//! reported as `Error::IncludeCycle`.

mod extender;

pub use extender::{expand_glob, read_config, ConfigExtender, INCLUDE_KEYWORD};
