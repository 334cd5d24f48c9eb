//! Schema inference module
//!
//! Infers a relational schema (tables, columns, types) from nested
//! documents and persists it as a versioned JSON file.
//!
//! # Features
//!
//! - **Type Inference**: scalar values to `SchemaType`, with widening
//! - **Enum Hints**: bounded sets of distinct observed values
//! - **Length Hints**: padded maximum string lengths
//! - **Lifecycle**: `begin → contribute* → end`, plus `resume` for restored schemas
//! - **Persistence**: `schema.toss` files with a format version
//! - **Arrow View**: one Arrow schema per table

mod arrow_view;
mod inference;
mod persist;
mod store;
mod types;

pub use inference::{infer_scalar, infer_type, widen};
pub use persist::{render_document, DATA_KEY, METADATA_KEY, SCHEMA_VERSION};
pub use store::{TosserSchema, SCHEMA_DEFAULT_FILE_NAME, SCHEMA_FILE_EXT};
pub use types::{
    InferenceOptions, SchemaColumn, SchemaTable, SchemaType, TypeVar, DEFAULT_ENUM_MAX,
    DEFAULT_LENGTH_PAD,
};

#[cfg(test)]
mod tests;
