//! Schema types
//!
//! Types, columns and tables of the inferred relational schema.

use crate::error::{Error, Result};
use crate::types::JsonValue;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::LazyLock;

/// Default maximum number of distinct enum values tracked per column
pub const DEFAULT_ENUM_MAX: usize = 10;

/// Default padding added to the longest observed string length
pub const DEFAULT_LENGTH_PAD: usize = 10;

/// Matches `type` or `type(length)`
static TYPE_VAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([a-z]+)\s*(?:\(\s*(\d+)\s*\))?\s*$").unwrap());

// ============================================================================
// Schema Type
// ============================================================================

/// Column type in the inferred schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Integer,
    Decimal,
    Boolean,
    Null,
    Time,
    Date,
    Datetime,
    Object,
    Array,
    Unknown,
}

impl SchemaType {
    /// Lower-case name used in type strings
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::String => "string",
            SchemaType::Integer => "integer",
            SchemaType::Decimal => "decimal",
            SchemaType::Boolean => "boolean",
            SchemaType::Null => "null",
            SchemaType::Time => "time",
            SchemaType::Date => "date",
            SchemaType::Datetime => "datetime",
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::Unknown => "unknown",
        }
    }

    /// Whether distinct values of this type are tracked as an enum hint
    pub fn is_enum_eligible(&self) -> bool {
        matches!(
            self,
            SchemaType::String | SchemaType::Integer | SchemaType::Boolean
        )
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "string" => Ok(SchemaType::String),
            "integer" => Ok(SchemaType::Integer),
            "decimal" => Ok(SchemaType::Decimal),
            "boolean" => Ok(SchemaType::Boolean),
            "null" => Ok(SchemaType::Null),
            "time" => Ok(SchemaType::Time),
            "date" => Ok(SchemaType::Date),
            "datetime" => Ok(SchemaType::Datetime),
            "object" => Ok(SchemaType::Object),
            "array" => Ok(SchemaType::Array),
            "unknown" => Ok(SchemaType::Unknown),
            other => Err(Error::invalid_value("type", format!("unknown type '{other}'"))),
        }
    }
}

// ============================================================================
// Type Var
// ============================================================================

/// A schema type with an optional length (meaningful for strings only)
///
/// Serialized as `type` or `type(length)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeVar {
    pub schema_type: SchemaType,
    pub length: Option<usize>,
}

impl TypeVar {
    /// Create a type var without length
    pub fn new(schema_type: SchemaType) -> Self {
        Self {
            schema_type,
            length: None,
        }
    }

    /// Create a string type var with a length
    pub fn string(length: usize) -> Self {
        Self {
            schema_type: SchemaType::String,
            length: Some(length),
        }
    }

    /// Check the base type
    pub fn is(&self, schema_type: SchemaType) -> bool {
        self.schema_type == schema_type
    }
}

impl From<SchemaType> for TypeVar {
    fn from(schema_type: SchemaType) -> Self {
        Self::new(schema_type)
    }
}

impl fmt::Display for TypeVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.length {
            Some(length) => write!(f, "{}({length})", self.schema_type),
            None => write!(f, "{}", self.schema_type),
        }
    }
}

impl FromStr for TypeVar {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let caps = TYPE_VAR_REGEX
            .captures(s)
            .ok_or_else(|| Error::invalid_value("type", format!("malformed type string '{s}'")))?;

        let schema_type: SchemaType = caps[1].parse()?;
        let length = caps
            .get(2)
            .map(|m| {
                m.as_str()
                    .parse::<usize>()
                    .map_err(|e| Error::invalid_value("type", format!("bad length in '{s}': {e}")))
            })
            .transpose()?;

        Ok(Self {
            schema_type,
            length,
        })
    }
}

impl Serialize for TypeVar {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TypeVar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Schema Column
// ============================================================================

/// A column of an inferred table
///
/// Identity is `(table_name, column_name)`; the type metadata mutates in
/// place as more documents are contributed.
#[derive(Debug, Clone)]
pub struct SchemaColumn {
    pub table_name: String,
    pub column_name: String,
    /// Inferred (widened) type
    pub type_var: TypeVar,
    /// Type declared by the mapping policy, if any
    pub hint: Option<TypeVar>,
    /// Distinct observed values, in first-seen order; `None` once ineligible
    pub enum_values: Option<Vec<JsonValue>>,
    /// Padded maximum string length
    pub max_length: Option<usize>,
}

impl SchemaColumn {
    /// Create a column with an initial type
    pub fn new(
        table_name: impl Into<String>,
        column_name: impl Into<String>,
        type_var: TypeVar,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            column_name: column_name.into(),
            type_var,
            hint: None,
            enum_values: None,
            max_length: None,
        }
    }

    /// Type downstream consumers should use: the declared hint if present
    pub fn effective_type(&self) -> &TypeVar {
        self.hint.as_ref().unwrap_or(&self.type_var)
    }

    /// Check if an enum hint is still tracked
    pub fn has_enum(&self) -> bool {
        self.enum_values.is_some()
    }
}

impl PartialEq for SchemaColumn {
    fn eq(&self, other: &Self) -> bool {
        self.table_name == other.table_name && self.column_name == other.column_name
    }
}

impl Eq for SchemaColumn {}

impl Hash for SchemaColumn {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.table_name.hash(state);
        self.column_name.hash(state);
    }
}

// ============================================================================
// Schema Table
// ============================================================================

/// A table of the inferred schema
///
/// Identity is the table name only. A table without a parent is a
/// dependency root.
#[derive(Debug, Clone)]
pub struct SchemaTable {
    pub name: String,
    pub parent: Option<String>,
}

impl SchemaTable {
    /// Create a dependency-root table
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
        }
    }

    /// Create a table depending on `parent`
    pub fn with_parent(name: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: Some(parent.into()),
        }
    }

    /// Check if this table has no parent
    pub fn is_dependency_root(&self) -> bool {
        self.parent.is_none()
    }
}

impl PartialEq for SchemaTable {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for SchemaTable {}

impl Hash for SchemaTable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for SchemaTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ============================================================================
// Inference Options
// ============================================================================

/// Tunables for type/enum/length accumulation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InferenceOptions {
    /// Maximum distinct values kept before a column loses its enum hint
    pub enum_max: usize,
    /// Padding added to the longest observed string length
    pub length_pad: usize,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            enum_max: DEFAULT_ENUM_MAX,
            length_pad: DEFAULT_LENGTH_PAD,
        }
    }
}

impl InferenceOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the enum cardinality cap
    #[must_use]
    pub fn with_enum_max(mut self, enum_max: usize) -> Self {
        self.enum_max = enum_max;
        self
    }

    /// Set the string length padding
    #[must_use]
    pub fn with_length_pad(mut self, length_pad: usize) -> Self {
        self.length_pad = length_pad;
        self
    }
}
