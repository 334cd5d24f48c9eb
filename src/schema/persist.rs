//! Schema file persistence
//!
//! ```json
//! {
//!   "data": {
//!     "<table>": {
//!       "<column>": {"type": "string(12)", "hint": null, "enum": ["a"], "max_length": 22}
//!     }
//!   },
//!   "__TOSSER_metadata__": {"version": 1}
//! }
//! ```

use super::store::{TableEntry, TosserSchema};
use super::types::{InferenceOptions, SchemaColumn, SchemaTable, SchemaType, TypeVar};
use crate::error::{Error, Result};
use crate::mapping::TosserMap;
use crate::types::{JsonObject, JsonValue};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Schema file format version
pub const SCHEMA_VERSION: i64 = 1;

/// Top-level key of the metadata section
pub const METADATA_KEY: &str = "__TOSSER_metadata__";

/// Top-level key of the data section
pub const DATA_KEY: &str = "data";

// ============================================================================
// Serialized shapes
// ============================================================================

struct DataSection<'a>(&'a [TableEntry]);

impl Serialize for DataSection<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in self.0 {
            map.serialize_entry(&entry.table.name, &ColumnsSection(&entry.columns))?;
        }
        map.end()
    }
}

struct ColumnsSection<'a>(&'a [SchemaColumn]);

impl Serialize for ColumnsSection<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for column in self.0 {
            map.serialize_entry(&column.column_name, &ColumnEntry::from(column))?;
        }
        map.end()
    }
}

#[derive(Serialize)]
struct ColumnEntry<'a> {
    #[serde(rename = "type")]
    type_var: &'a TypeVar,
    hint: Option<&'a TypeVar>,
    #[serde(rename = "enum")]
    enum_values: Option<&'a Vec<JsonValue>>,
    max_length: Option<usize>,
}

impl<'a> From<&'a SchemaColumn> for ColumnEntry<'a> {
    fn from(column: &'a SchemaColumn) -> Self {
        Self {
            type_var: &column.type_var,
            hint: column.hint.as_ref(),
            // A null-only column has seen no values yet
            enum_values: column
                .enum_values
                .as_ref()
                .filter(|_| column.type_var.schema_type != SchemaType::Null),
            max_length: column.max_length,
        }
    }
}

#[derive(Deserialize)]
struct StoredColumn {
    #[serde(rename = "type")]
    type_var: TypeVar,
    #[serde(default)]
    hint: Option<TypeVar>,
    #[serde(rename = "enum", default)]
    enum_values: Option<Vec<JsonValue>>,
    #[serde(default)]
    max_length: Option<usize>,
}

/// Wrap a data section in the versioned file envelope
///
/// Serialization failures are logged and degrade to a metadata-only
/// document; a file without a data section signals a failed write.
pub fn render_document<T: Serialize + ?Sized>(data: &T) -> JsonValue {
    let metadata = json!({ "version": SCHEMA_VERSION });
    match serde_json::to_value(data) {
        Ok(data) => json!({ DATA_KEY: data, METADATA_KEY: metadata }),
        Err(e) => {
            error!(error = %e, "Failed to serialize schema, writing metadata only");
            json!({ METADATA_KEY: metadata })
        }
    }
}

// ============================================================================
// Rendering and writing
// ============================================================================

impl TosserSchema {
    /// Render the registry as a schema file document
    pub fn render(&self) -> JsonValue {
        render_document(&DataSection(&self.tables))
    }

    /// Render the schema file as pretty-printed JSON
    pub fn render_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.render())?)
    }

    /// Write `<dir>/<file_name>`, returning the written path
    pub async fn write(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        self.write_to(&path).await?;
        Ok(path)
    }

    /// Write the schema file to an explicit path
    ///
    /// Refused while a session is generating.
    pub async fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        if self.is_generating() {
            return Err(Error::lifecycle("write", self.state_label()));
        }

        let path = path.as_ref();
        let contents = self.render_string()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::schema_file(path.display().to_string(), e.to_string()))?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await.map_err(|e| {
            Error::schema_file(
                path.display().to_string(),
                format!("Failed to write schema file: {e}"),
            )
        })?;

        tokio::fs::rename(&temp_path, path).await.map_err(|e| {
            Error::schema_file(
                path.display().to_string(),
                format!("Failed to rename schema file: {e}"),
            )
        })?;

        debug!(path = %path.display(), tables = self.tables.len(), "Wrote schema file");
        Ok(())
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Restore a schema from a file
    ///
    /// Tables come back without parent links; the restored schema is idle
    /// and complete.
    pub fn load(
        path: impl AsRef<Path>,
        policy: TosserMap,
        options: InferenceOptions,
    ) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::schema_file(
                path.display().to_string(),
                format!("Failed to read schema file: {e}"),
            )
        })?;

        let mut schema = Self::parse(&contents, &path.display().to_string(), policy, options)?;
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            schema.file_name = name.to_string();
        }
        Ok(schema)
    }

    /// Restore a schema from JSON text
    pub fn from_json(json: &str, policy: TosserMap, options: InferenceOptions) -> Result<Self> {
        Self::parse(json, "<inline>", policy, options)
    }

    fn parse(
        json: &str,
        origin: &str,
        policy: TosserMap,
        options: InferenceOptions,
    ) -> Result<Self> {
        let document: JsonValue = serde_json::from_str(json)
            .map_err(|e| Error::schema_file(origin, format!("Failed to parse schema file: {e}")))?;
        let document = document
            .as_object()
            .ok_or_else(|| Error::schema_file(origin, "expected a JSON object"))?;

        let version = document
            .get(METADATA_KEY)
            .and_then(|m| m.get("version"))
            .and_then(JsonValue::as_i64)
            .ok_or_else(|| Error::schema_file(origin, "missing schema file version"))?;
        if version != SCHEMA_VERSION {
            return Err(Error::UnsupportedSchemaVersion {
                found: version,
                expected: SCHEMA_VERSION,
            });
        }

        let mut schema = Self::with_options(policy, options);

        match document.get(DATA_KEY) {
            Some(JsonValue::Object(tables)) => {
                for (table_name, columns) in tables {
                    restore_table(&mut schema, origin, table_name, columns)?;
                }
            }
            None | Some(JsonValue::Null) => {
                warn!(origin, "Schema file has no data section, loading an empty schema");
            }
            Some(_) => {
                return Err(Error::schema_file(origin, "data section must be an object"));
            }
        }

        schema.set_complete(true);
        debug!(origin, tables = schema.tables.len(), "Loaded schema file");
        Ok(schema)
    }
}

fn restore_table(
    schema: &mut TosserSchema,
    origin: &str,
    table_name: &str,
    columns: &JsonValue,
) -> Result<()> {
    let columns: &JsonObject = columns.as_object().ok_or_else(|| {
        Error::schema_file(origin, format!("table '{table_name}' must be an object"))
    })?;

    let idx = schema.insert_table(SchemaTable::new(table_name));
    for (column_name, stored) in columns {
        let stored: StoredColumn = serde_json::from_value(stored.clone()).map_err(|e| {
            Error::schema_file(
                origin,
                format!("column '{table_name}.{column_name}': {e}"),
            )
        })?;

        let mut column = SchemaColumn::new(table_name, column_name, stored.type_var);
        column.hint = stored.hint;
        column.enum_values = match stored.enum_values {
            None if column.type_var.schema_type == SchemaType::Null => Some(Vec::new()),
            values => values,
        };
        column.max_length = stored.max_length;
        schema.tables[idx].insert_column(column);
    }
    Ok(())
}
