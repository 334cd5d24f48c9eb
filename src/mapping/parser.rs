//! Mapping policy loader
//!
//! Reads a policy file (YAML or JSON, with `@include` expansion), builds the
//! `TosserMap` and validates it.

use super::types::{Directive, MapTable, TosserMap, TABLE_PLACEHOLDER};
use crate::error::{Error, Result};
use crate::include::ConfigExtender;
use crate::types::JsonValue;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Load a mapping policy from a file, expanding `@include` directives
pub fn load_map(path: impl AsRef<Path>) -> Result<TosserMap> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let tree = ConfigExtender::new(path).render()?;

    let map = load_map_from_value(&tree)?;
    debug!(
        path = %path.display(),
        schema = %map.schema,
        tables = map.tables.len(),
        "Loaded mapping policy"
    );
    Ok(map)
}

/// Load a mapping policy from a YAML (or JSON) string without includes
pub fn load_map_from_str(yaml: &str) -> Result<TosserMap> {
    let tree: JsonValue = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse mapping policy YAML: {e}")))?;
    load_map_from_value(&tree)
}

/// Build and validate a mapping policy from an already merged tree
pub fn load_map_from_value(tree: &JsonValue) -> Result<TosserMap> {
    let map = TosserMap::from_value(tree)?;
    validate_map(&map)?;
    Ok(map)
}

/// Validate a mapping policy
pub fn validate_map(map: &TosserMap) -> Result<()> {
    if map.schema.trim().is_empty() {
        return Err(Error::config("Mapping policy schema name cannot be empty"));
    }

    if map.root_table.trim().is_empty() {
        return Err(Error::config("Mapping policy root table cannot be empty"));
    }

    if map.table_delimiter.is_empty() {
        return Err(Error::config("Mapping policy delimiter cannot be empty"));
    }

    if !map.key_template.contains(TABLE_PLACEHOLDER) {
        return Err(Error::invalid_value(
            "key",
            format!(
                "key template '{}' must contain {TABLE_PLACEHOLDER}",
                map.key_template
            ),
        ));
    }

    // Each derived name may be folded into at most one table
    let mut claimed: HashMap<&str, &str> = HashMap::new();
    for (name, table) in &map.tables {
        for derived in &table.source {
            if derived == &map.root_table {
                return Err(Error::config(format!(
                    "Table '{name}' cannot take the root table '{derived}' as a source"
                )));
            }
            if let Some(previous) = claimed.insert(derived.as_str(), name.as_str()) {
                return Err(Error::config(format!(
                    "Derived table '{derived}' is claimed as a source by both '{previous}' and '{name}'"
                )));
            }
        }
        validate_table(name, table)?;
    }

    Ok(())
}

fn validate_table(name: &str, table: &MapTable) -> Result<()> {
    if let Some(key) = &table.key {
        if key.trim().is_empty() {
            return Err(Error::config(format!("Table '{name}' key cannot be empty")));
        }
    }

    for (column, override_) in &table.columns {
        if let Some(rename) = &override_.name {
            if rename.trim().is_empty() {
                return Err(Error::config(format!(
                    "Table '{name}' column '{column}' cannot be renamed to an empty name"
                )));
            }
        }
    }

    for (directive, args) in &table.directives {
        match directive {
            Directive::Values => {
                let valid = matches!(args.first(), Some(JsonValue::String(_))) && args.len() >= 2;
                if !valid {
                    return Err(Error::config(format!(
                        "Table '{name}' values directive needs a column name and at least one value"
                    )));
                }
            }
            Directive::Keep | Directive::Ignore => {
                if args.is_empty() || args.iter().any(|a| !a.is_string()) {
                    return Err(Error::config(format!(
                        "Table '{name}' {directive} directive needs one or more column names"
                    )));
                }
            }
        }
    }

    Ok(())
}
