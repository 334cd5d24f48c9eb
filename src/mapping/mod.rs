//! Mapping policy module
//!
//! The mapping policy (`TosserMap`) controls how document structure becomes
//! table and column names.
//!
//! # Overview
//!
//! - `TosserMap` - schema name, root table, key template, delimiter and flags
//! - `MapTable` - per-table key, `source` aliases, column overrides, directives
//! - `Directive` - `keep`, `ignore` and `values`
//! - YAML/JSON loading with `@include` expansion and validation
//!
//! # Example
//!
//! ```yaml
//! defaults:
//!   schema: shop
//!   roottable: orders
//! tables:
//!   items:
//!     source: [lines]
//!     directives:
//!       - [ignore, internal_note]
//! ```

mod parser;
mod types;

pub use parser::{load_map, load_map_from_str, load_map_from_value, validate_map};
pub use types::{
    Directive, MapColumn, MapTable, TosserMap, DEFAULT_DELIMITER, DEFAULT_KEY_TEMPLATE,
    TABLE_PLACEHOLDER,
};
