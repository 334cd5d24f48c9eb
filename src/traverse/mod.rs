//! Document tree traversal
//!
//! Walks a document's data tree and yields every scalar leaf together
//! with the full trail leading to it.
//!
//! # Overview
//!
//! The traverse module provides:
//! - `TrailToken` / `Trail` - Position of a value inside a document
//! - `Leaf` - A scalar value with its trail and owning key
//! - `Traverser` - Depth-first, pre-order walk over objects and arrays

mod types;
mod walker;

pub use types::{Leaf, Trail, TrailToken, ROOT_SENTINEL};
pub use walker::{traverse, Traverser};
