//! Arrow projection of the inferred schema
//!
//! Each table becomes an Arrow schema: its synthetic key, the parent's key
//! for dependent tables, then every inferred column as a nullable field.

use super::store::TosserSchema;
use super::types::SchemaType;
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use std::collections::{HashMap, HashSet};
use tracing::debug;

impl SchemaType {
    /// Arrow type used for columns of this type
    pub fn to_arrow(&self) -> DataType {
        match self {
            SchemaType::String | SchemaType::Object | SchemaType::Array => DataType::Utf8,
            SchemaType::Integer => DataType::Int64,
            SchemaType::Decimal => DataType::Float64,
            SchemaType::Boolean => DataType::Boolean,
            SchemaType::Null | SchemaType::Unknown => DataType::Null,
            SchemaType::Date => DataType::Date32,
            SchemaType::Time => DataType::Time64(TimeUnit::Microsecond),
            SchemaType::Datetime => DataType::Timestamp(TimeUnit::Microsecond, None),
        }
    }
}

impl TosserSchema {
    /// Project every table to an Arrow schema, in creation order
    pub fn to_arrow_schemas(&self) -> Vec<(String, Schema)> {
        let policy = self.policy();
        self.tables
            .iter()
            .map(|entry| {
                let table = &entry.table;
                let mut fields = Vec::with_capacity(entry.columns.len() + 2);
                let mut reserved = HashSet::new();
                let mut metadata = HashMap::new();

                let key = policy.key_name(&table.name);
                fields.push(Field::new(&key, DataType::Int64, false));
                reserved.insert(key);

                if let Some(parent) = &table.parent {
                    let parent_key = policy.key_name(parent);
                    if reserved.insert(parent_key.clone()) {
                        fields.push(Field::new(&parent_key, DataType::Int64, false));
                    }
                    metadata.insert("parent".to_string(), parent.clone());
                }

                for column in &entry.columns {
                    if reserved.contains(&column.column_name) {
                        debug!(
                            table = %table.name,
                            column = %column.column_name,
                            "Skipping column that collides with a key column"
                        );
                        continue;
                    }
                    let data_type = column.effective_type().schema_type.to_arrow();
                    fields.push(Field::new(&column.column_name, data_type, true));
                }

                metadata.insert("table".to_string(), table.name.clone());
                (
                    table.name.clone(),
                    Schema::new_with_metadata(fields, metadata),
                )
            })
            .collect()
    }
}
