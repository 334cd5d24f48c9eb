//! Resolver output types

use crate::schema::SchemaTable;

/// Column name used for array elements that have no field of their own
pub const VALUE_FIELD: &str = "@value";

/// Where a leaf lands in the schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Target table, with its parent wired to the first dependency
    pub table: SchemaTable,
    /// Derived column name (before any policy rename)
    pub column: String,
    /// Tables the target depends on, closest first; ends with the root table
    pub dependencies: Vec<SchemaTable>,
}

impl Resolved {
    /// Target plus dependencies ordered furthest first (valid creation order)
    pub fn creation_chain(&self) -> impl Iterator<Item = &SchemaTable> {
        self.dependencies
            .iter()
            .rev()
            .chain(std::iter::once(&self.table))
    }
}
