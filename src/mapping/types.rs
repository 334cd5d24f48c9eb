//! Mapping policy types
//!
//! The policy is built from a plain nested mapping (already expanded from
//! any `@include` directives). Keys are matched case-insensitively, and
//! policy-wide settings may sit either under `defaults` or at the top level.

use crate::error::{Error, Result};
use crate::schema::TypeVar;
use crate::types::{JsonObject, JsonValue};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Default synthetic key template
pub const DEFAULT_KEY_TEMPLATE: &str = "{table}_id";

/// Default delimiter between table/column name parts
pub const DEFAULT_DELIMITER: &str = "_";

/// Placeholder substituted with the table name in key templates
pub const TABLE_PLACEHOLDER: &str = "{table}";

// ============================================================================
// Directives
// ============================================================================

/// Per-table directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    /// Pin a column's enum to explicit values: `[values, column, v1, v2, ...]`
    Values,
    /// Allow-list of columns
    Keep,
    /// Deny-list of columns
    Ignore,
}

impl Directive {
    pub fn as_str(&self) -> &'static str {
        match self {
            Directive::Values => "values",
            Directive::Keep => "keep",
            Directive::Ignore => "ignore",
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Directive {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "values" => Ok(Directive::Values),
            "keep" => Ok(Directive::Keep),
            "ignore" => Ok(Directive::Ignore),
            other => Err(Error::invalid_value(
                "directives",
                format!("unknown directive '{other}' (expected keep, ignore or values)"),
            )),
        }
    }
}

// ============================================================================
// Map Column
// ============================================================================

/// Explicit override for one derived column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapColumn {
    /// Replacement column name
    pub name: Option<String>,
    /// Declared type, recorded as the column's hint
    pub type_var: Option<TypeVar>,
}

impl MapColumn {
    fn from_value(column: &str, value: &JsonValue) -> Result<Self> {
        match value {
            JsonValue::Null => Ok(Self::default()),
            // Shorthand: `sku: "string(32)"`
            JsonValue::String(s) => Ok(Self {
                name: None,
                type_var: Some(parse_type(column, s)?),
            }),
            JsonValue::Object(obj) => {
                let name = get_str(obj, "name", &format!("columns.{column}.name"))?;
                let type_var = get_str(obj, "type", &format!("columns.{column}.type"))?
                    .map(|t| parse_type(column, &t))
                    .transpose()?;
                Ok(Self { name, type_var })
            }
            _ => Err(Error::invalid_value(
                format!("columns.{column}"),
                "expected a mapping or a type string",
            )),
        }
    }
}

fn parse_type(column: &str, s: &str) -> Result<TypeVar> {
    s.parse::<TypeVar>().map_err(|e| {
        Error::invalid_value(format!("columns.{column}.type"), e.to_string())
    })
}

// ============================================================================
// Map Table
// ============================================================================

/// Per-table policy
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapTable {
    /// Key column name, overriding the policy's key template
    pub key: Option<String>,
    /// Derived table names folded into this table
    pub source: Vec<String>,
    /// Column overrides keyed by derived column name
    pub columns: BTreeMap<String, MapColumn>,
    /// Directives with their raw arguments, in declared order
    pub directives: Vec<(Directive, Vec<JsonValue>)>,
}

impl MapTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_source(mut self, derived: impl Into<String>) -> Self {
        self.source.push(derived.into());
        self
    }

    #[must_use]
    pub fn with_column(mut self, derived: impl Into<String>, column: MapColumn) -> Self {
        self.columns.insert(derived.into(), column);
        self
    }

    #[must_use]
    pub fn with_directive(mut self, directive: Directive, args: Vec<JsonValue>) -> Self {
        self.directives.push((directive, args));
        self
    }

    /// Whether a derived column passes the `keep`/`ignore` directives
    pub fn allows(&self, column: &str) -> bool {
        let mut has_keep = false;
        let mut kept = false;
        for (directive, args) in &self.directives {
            match directive {
                Directive::Ignore if contains_name(args, column) => return false,
                Directive::Keep => {
                    has_keep = true;
                    kept |= contains_name(args, column);
                }
                _ => {}
            }
        }
        !has_keep || kept
    }

    /// Values pinned by a `values` directive for a derived column
    pub fn pinned_values(&self, column: &str) -> Option<&[JsonValue]> {
        self.directives.iter().find_map(|(directive, args)| {
            match (directive, args.split_first()) {
                (Directive::Values, Some((JsonValue::String(name), rest))) if name == column => {
                    Some(rest)
                }
                _ => None,
            }
        })
    }

    /// Override for a derived column
    pub fn column(&self, column: &str) -> Option<&MapColumn> {
        self.columns.get(column)
    }

    /// Final column name after any rename override
    pub fn column_name<'a>(&'a self, column: &'a str) -> &'a str {
        self.columns
            .get(column)
            .and_then(|c| c.name.as_deref())
            .unwrap_or(column)
    }

    fn from_value(table: &str, value: &JsonValue) -> Result<Self> {
        let obj = match value {
            JsonValue::Null => return Ok(Self::default()),
            JsonValue::Object(obj) => obj,
            _ => {
                return Err(Error::invalid_value(
                    format!("tables.{table}"),
                    "expected a mapping",
                ))
            }
        };

        let key = get_str(obj, "key", &format!("tables.{table}.key"))?;

        let source = match get_field(obj, "source") {
            None | Some(JsonValue::Null) => Vec::new(),
            Some(JsonValue::String(s)) => vec![s.clone()],
            Some(JsonValue::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        Error::invalid_value(
                            format!("tables.{table}.source"),
                            "entries must be strings",
                        )
                    })
                })
                .collect::<Result<_>>()?,
            Some(_) => {
                return Err(Error::invalid_value(
                    format!("tables.{table}.source"),
                    "expected a string or a list of strings",
                ))
            }
        };

        let mut columns = BTreeMap::new();
        match get_field(obj, "columns") {
            None | Some(JsonValue::Null) => {}
            Some(JsonValue::Object(cols)) => {
                for (name, col) in cols {
                    columns.insert(name.clone(), MapColumn::from_value(name, col)?);
                }
            }
            Some(_) => {
                return Err(Error::invalid_value(
                    format!("tables.{table}.columns"),
                    "expected a mapping",
                ))
            }
        }

        let directives = match get_field(obj, "directives") {
            None | Some(JsonValue::Null) => Vec::new(),
            Some(JsonValue::Array(items)) => items
                .iter()
                .map(|item| parse_directive(table, item))
                .collect::<Result<_>>()?,
            Some(JsonValue::Object(map)) => map
                .iter()
                .map(|(name, args)| {
                    let mut entry = JsonObject::new();
                    entry.insert(name.clone(), args.clone());
                    parse_directive(table, &JsonValue::Object(entry))
                })
                .collect::<Result<_>>()?,
            Some(_) => {
                return Err(Error::invalid_value(
                    format!("tables.{table}.directives"),
                    "expected a list",
                ))
            }
        };

        Ok(Self {
            key,
            source,
            columns,
            directives,
        })
    }
}

/// Accepts `[keep, a, b]` or `{keep: [a, b]}`
fn parse_directive(table: &str, value: &JsonValue) -> Result<(Directive, Vec<JsonValue>)> {
    let field = format!("tables.{table}.directives");
    match value {
        JsonValue::Array(items) => {
            let (name, args) = items
                .split_first()
                .ok_or_else(|| Error::invalid_value(&field, "empty directive"))?;
            let name = name
                .as_str()
                .ok_or_else(|| Error::invalid_value(&field, "directive name must be a string"))?;
            Ok((name.parse()?, args.to_vec()))
        }
        JsonValue::Object(map) if map.len() == 1 => {
            let (name, args) = map
                .iter()
                .next()
                .ok_or_else(|| Error::invalid_value(&field, "empty directive"))?;
            let args = match args {
                JsonValue::Array(items) => items.clone(),
                JsonValue::Null => Vec::new(),
                other => vec![other.clone()],
            };
            Ok((name.parse()?, args))
        }
        JsonValue::String(name) => Ok((name.parse()?, Vec::new())),
        _ => Err(Error::invalid_value(
            field,
            "each directive must be a list or a single-key mapping",
        )),
    }
}

fn contains_name(args: &[JsonValue], column: &str) -> bool {
    args.iter().any(|a| a.as_str() == Some(column))
}

// ============================================================================
// Tosser Map
// ============================================================================

/// The mapping policy controlling naming, flattening and per-table overrides
#[derive(Debug, Clone, PartialEq)]
pub struct TosserMap {
    pub schema: String,
    pub root_table: String,
    /// Synthetic key format, `{table}` is replaced by the table name
    pub key_template: String,
    pub table_delimiter: String,
    /// Fold nested object keys into compound column names
    pub flatten_objects: bool,
    /// Prefix every non-root table name with the root table name
    pub prefix_root: bool,
    /// Keep deriving table names past the nearest array boundary
    pub climb_arrays: bool,
    pub tables: BTreeMap<String, MapTable>,
}

impl TosserMap {
    /// Create a policy with default settings
    pub fn new(schema: impl Into<String>, root_table: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            root_table: root_table.into(),
            key_template: DEFAULT_KEY_TEMPLATE.to_string(),
            table_delimiter: DEFAULT_DELIMITER.to_string(),
            flatten_objects: true,
            prefix_root: false,
            climb_arrays: false,
            tables: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_key_template(mut self, template: impl Into<String>) -> Self {
        self.key_template = template.into();
        self
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.table_delimiter = delimiter.into();
        self
    }

    #[must_use]
    pub fn with_flatten_objects(mut self, flatten: bool) -> Self {
        self.flatten_objects = flatten;
        self
    }

    #[must_use]
    pub fn with_prefix_root(mut self, prefix: bool) -> Self {
        self.prefix_root = prefix;
        self
    }

    #[must_use]
    pub fn with_climb_arrays(mut self, climb: bool) -> Self {
        self.climb_arrays = climb;
        self
    }

    #[must_use]
    pub fn with_table(mut self, name: impl Into<String>, table: MapTable) -> Self {
        self.tables.insert(name.into(), table);
        self
    }

    /// Build a policy from a merged configuration tree (not validated)
    pub fn from_value(value: &JsonValue) -> Result<Self> {
        let root = value
            .as_object()
            .ok_or_else(|| Error::config("Mapping policy must be a mapping"))?;

        let defaults = match get_field(root, "defaults") {
            Some(JsonValue::Object(d)) => Some(d),
            None | Some(JsonValue::Null) => None,
            Some(_) => return Err(Error::invalid_value("defaults", "expected a mapping")),
        };
        // A setting under `defaults` wins over the same key at the top level
        let lookup = |name: &str| {
            defaults
                .and_then(|d| get_field(d, name))
                .or_else(|| get_field(root, name))
        };

        let schema = lookup("schema")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| Error::missing_field("schema"))?;
        let root_table = lookup("roottable")
            .or_else(|| lookup("root_table"))
            .and_then(JsonValue::as_str)
            .ok_or_else(|| Error::missing_field("roottable"))?;

        let mut map = Self::new(schema, root_table);

        if let Some(key) = string_setting(lookup("key"), "key")? {
            map.key_template = key;
        }
        if let Some(delimiter) = string_setting(lookup("delimiter"), "delimiter")? {
            map.table_delimiter = delimiter;
        }
        if let Some(flatten) = bool_setting(lookup("flatten"), "flatten")? {
            map.flatten_objects = flatten;
        }
        if let Some(prefix) = bool_setting(lookup("prefix_root"), "prefix_root")? {
            map.prefix_root = prefix;
        }
        if let Some(climb) = bool_setting(lookup("climb_arrays"), "climb_arrays")? {
            map.climb_arrays = climb;
        }

        match get_field(root, "tables") {
            None | Some(JsonValue::Null) => {}
            Some(JsonValue::Object(tables)) => {
                for (name, table) in tables {
                    map.tables
                        .insert(name.clone(), MapTable::from_value(name, table)?);
                }
            }
            Some(_) => return Err(Error::invalid_value("tables", "expected a mapping")),
        }

        Ok(map)
    }

    /// Per-table policy, if declared
    pub fn table(&self, name: &str) -> Option<&MapTable> {
        self.tables.get(name)
    }

    /// Key column name for a table
    pub fn key_name(&self, table: &str) -> String {
        self.tables
            .get(table)
            .and_then(|t| t.key.clone())
            .unwrap_or_else(|| self.key_template.replace(TABLE_PLACEHOLDER, table))
    }

    /// Final name of a derived table after `source` aliasing
    ///
    /// The root table is never aliased.
    pub fn alias_table<'a>(&'a self, derived: &'a str) -> &'a str {
        if derived == self.root_table {
            return derived;
        }
        self.tables
            .iter()
            .find(|(_, t)| t.source.iter().any(|s| s == derived))
            .map_or(derived, |(name, _)| name.as_str())
    }

    /// Join name parts with the table delimiter
    pub fn join<S: AsRef<str>>(&self, parts: &[S]) -> String {
        parts
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(&self.table_delimiter)
    }
}

// ============================================================================
// Field helpers
// ============================================================================

/// Case-insensitive field lookup
pub(crate) fn get_field<'a>(obj: &'a JsonObject, name: &str) -> Option<&'a JsonValue> {
    obj.get(name).or_else(|| {
        obj.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    })
}

fn get_str(obj: &JsonObject, name: &str, field: &str) -> Result<Option<String>> {
    string_setting(get_field(obj, name), field)
}

fn string_setting(value: Option<&JsonValue>, field: &str) -> Result<Option<String>> {
    match value {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(Error::invalid_value(field, "expected a string")),
    }
}

fn bool_setting(value: Option<&JsonValue>, field: &str) -> Result<Option<bool>> {
    match value {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(Error::invalid_value(field, "expected true or false")),
    }
}
