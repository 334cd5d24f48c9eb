//! Schema store
//!
//! Owns the generation lifecycle and the table/column registry, and folds
//! every contributed document into it.

use super::inference::infer_type;
use super::types::{InferenceOptions, SchemaColumn, SchemaTable, SchemaType};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::mapping::{MapTable, TosserMap};
use crate::resolve::{Resolved, Resolver};
use crate::traverse::{traverse, ROOT_SENTINEL};
use crate::types::JsonValue;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Schema file extension
pub const SCHEMA_FILE_EXT: &str = "toss";

/// Default schema file stem
pub const SCHEMA_DEFAULT_FILE_NAME: &str = "schema";

/// Generation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GenerationState {
    Idle,
    Generating,
}

/// A table together with its columns in insertion order
#[derive(Debug, Clone)]
pub(crate) struct TableEntry {
    pub(crate) table: SchemaTable,
    pub(crate) columns: Vec<SchemaColumn>,
    column_index: HashMap<String, usize>,
}

impl TableEntry {
    pub(crate) fn new(table: SchemaTable) -> Self {
        Self {
            table,
            columns: Vec::new(),
            column_index: HashMap::new(),
        }
    }

    fn column_mut(&mut self, name: &str) -> Option<&mut SchemaColumn> {
        let idx = *self.column_index.get(name)?;
        self.columns.get_mut(idx)
    }

    pub(crate) fn insert_column(&mut self, column: SchemaColumn) {
        match self.column_index.get(&column.column_name) {
            Some(&idx) => self.columns[idx] = column,
            None => {
                self.column_index
                    .insert(column.column_name.clone(), self.columns.len());
                self.columns.push(column);
            }
        }
    }
}

/// Inferred schema for one mapping policy
///
/// A session is `begin → contribute* → end`; the result is persisted with
/// an explicit `write`. The registry is exclusively owned by the session
/// driving `contribute`.
#[derive(Debug, Clone)]
pub struct TosserSchema {
    policy: TosserMap,
    options: InferenceOptions,
    state: GenerationState,
    complete: bool,
    contributions: u64,
    pub(crate) file_name: String,
    pub(crate) tables: Vec<TableEntry>,
    table_index: HashMap<String, usize>,
}

impl TosserSchema {
    /// Create an empty schema against a mapping policy
    pub fn new(policy: TosserMap) -> Self {
        Self::with_options(policy, InferenceOptions::default())
    }

    /// Create an empty schema with explicit inference options
    pub fn with_options(policy: TosserMap, options: InferenceOptions) -> Self {
        Self {
            policy,
            options,
            state: GenerationState::Idle,
            complete: false,
            contributions: 0,
            file_name: format!("{SCHEMA_DEFAULT_FILE_NAME}.{SCHEMA_FILE_EXT}"),
            tables: Vec::new(),
            table_index: HashMap::new(),
        }
    }

    /// Set the file name used by `write`
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Start a fresh generation session, clearing the registry
    pub fn begin(&mut self) -> Result<()> {
        self.ensure_idle("begin")?;
        self.tables.clear();
        self.table_index.clear();
        self.contributions = 0;
        self.complete = false;
        self.state = GenerationState::Generating;
        debug!(schema = %self.policy.schema, "Schema generation started");
        Ok(())
    }

    /// Start a session that keeps widening the existing registry
    pub fn resume(&mut self) -> Result<()> {
        self.ensure_idle("resume")?;
        self.complete = false;
        self.state = GenerationState::Generating;
        debug!(
            schema = %self.policy.schema,
            tables = self.tables.len(),
            "Schema generation resumed"
        );
        Ok(())
    }

    /// Finish the session
    pub fn end(&mut self) -> Result<()> {
        if !self.is_generating() {
            return Err(Error::lifecycle("end", self.state_label()));
        }
        self.state = GenerationState::Idle;
        self.complete = true;
        debug!(
            schema = %self.policy.schema,
            contributions = self.contributions,
            tables = self.tables.len(),
            "Schema generation ended"
        );
        Ok(())
    }

    fn ensure_idle(&self, operation: &str) -> Result<()> {
        if self.is_generating() {
            return Err(Error::lifecycle(operation, self.state_label()));
        }
        Ok(())
    }

    pub(crate) fn state_label(&self) -> &'static str {
        match (self.state, self.complete) {
            (GenerationState::Generating, _) => "generating",
            (GenerationState::Idle, true) => "complete",
            (GenerationState::Idle, false) => "idle",
        }
    }

    // ========================================================================
    // Contribution
    // ========================================================================

    /// Fold one document into the registry
    ///
    /// Every leaf is resolved before anything is registered, so a document
    /// with an unsupported structure leaves the registry untouched.
    pub fn contribute(&mut self, document: &Document) -> Result<()> {
        if !self.is_generating() {
            return Err(Error::lifecycle("contribute", self.state_label()));
        }
        if document.is_root_array() {
            return Err(Error::unsupported(
                ROOT_SENTINEL,
                "root-level arrays are not supported",
            ));
        }

        let resolved = {
            let resolver = Resolver::new(&self.policy);
            traverse(&document.data)
                .map(|leaf| Ok((resolver.resolve(&leaf.trail)?, leaf.value)))
                .collect::<Result<Vec<_>>>()?
        };

        if !self.table_index.contains_key(&self.policy.root_table) {
            let root = SchemaTable::new(&self.policy.root_table);
            self.insert_table(root);
        }

        for (target, value) in resolved {
            let idx = self.ensure_tables(&target)?;
            let map_table = self.policy.table(&target.table.name);
            register_column(
                &mut self.tables[idx],
                map_table,
                &self.options,
                &target.column,
                value,
            );
        }

        self.contributions += 1;
        match document.source_name() {
            Some(source) => debug!(source, count = self.contributions, "Contributed document"),
            None => debug!(count = self.contributions, "Contributed document"),
        }
        Ok(())
    }

    /// Create the missing tables of a chain, furthest dependency first
    fn ensure_tables(&mut self, target: &Resolved) -> Result<usize> {
        let mut last = 0;
        for table in target.creation_chain() {
            last = match self.table_index.get(&table.name) {
                Some(&idx) => {
                    let existing = &mut self.tables[idx].table;
                    if let Some(parent) = &table.parent {
                        match existing.parent.as_deref() {
                            None => existing.parent = Some(parent.clone()),
                            Some(current) if current != parent.as_str() => {
                                return Err(Error::Other(format!(
                                    "Table '{}' already depends on '{current}', cannot rewire it to '{parent}'",
                                    table.name
                                )));
                            }
                            Some(_) => {}
                        }
                    }
                    idx
                }
                None => self.insert_table(table.clone()),
            };
        }
        Ok(last)
    }

    pub(crate) fn insert_table(&mut self, table: SchemaTable) -> usize {
        debug!(table = %table.name, parent = ?table.parent, "Created table");
        let idx = self.tables.len();
        self.table_index.insert(table.name.clone(), idx);
        self.tables.push(TableEntry::new(table));
        idx
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn policy(&self) -> &TosserMap {
        &self.policy
    }

    pub fn options(&self) -> &InferenceOptions {
        &self.options
    }

    pub fn name(&self) -> &str {
        &self.policy.schema
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn is_generating(&self) -> bool {
        self.state == GenerationState::Generating
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub(crate) fn set_complete(&mut self, complete: bool) {
        self.complete = complete;
    }

    /// Number of documents contributed in the current session
    pub fn contributions(&self) -> u64 {
        self.contributions
    }

    /// Tables in creation order (a valid creation order for a target)
    pub fn tables(&self) -> impl Iterator<Item = &SchemaTable> {
        self.tables.iter().map(|entry| &entry.table)
    }

    pub fn table(&self, name: &str) -> Option<&SchemaTable> {
        self.entry(name).map(|entry| &entry.table)
    }

    /// Columns of a table in insertion order
    pub fn columns(&self, table: &str) -> &[SchemaColumn] {
        self.entry(table)
            .map(|entry| entry.columns.as_slice())
            .unwrap_or_default()
    }

    pub fn column(&self, table: &str, column: &str) -> Option<&SchemaColumn> {
        let entry = self.entry(table)?;
        let idx = *entry.column_index.get(column)?;
        entry.columns.get(idx)
    }

    pub fn column_count(&self) -> usize {
        self.tables.iter().map(|entry| entry.columns.len()).sum()
    }

    fn entry(&self, name: &str) -> Option<&TableEntry> {
        self.table_index.get(name).map(|&idx| &self.tables[idx])
    }
}

// ============================================================================
// Column registration
// ============================================================================

fn register_column(
    entry: &mut TableEntry,
    map_table: Option<&MapTable>,
    options: &InferenceOptions,
    derived: &str,
    value: &JsonValue,
) {
    if map_table.is_some_and(|t| !t.allows(derived)) {
        return;
    }

    let override_ = map_table.and_then(|t| t.column(derived));
    let name = map_table.map_or(derived, |t| t.column_name(derived));
    let pinned = map_table.and_then(|t| t.pinned_values(derived));

    if entry.column_index.contains_key(name) {
        if let Some(column) = entry.column_mut(name) {
            column.type_var = infer_type(value, Some(&column.type_var));
        }
    } else {
        let type_var = infer_type(value, None);
        let schema_type = type_var.schema_type;
        let mut column = SchemaColumn::new(&entry.table.name, name, type_var);
        column.enum_values = match pinned {
            Some(values) => Some(values.to_vec()),
            None if schema_type.is_enum_eligible() || schema_type == SchemaType::Null => {
                Some(Vec::new())
            }
            None => None,
        };
        entry.insert_column(column);
    }

    let Some(column) = entry.column_mut(name) else {
        return;
    };

    if let Some(hint) = override_.and_then(|o| o.type_var.as_ref()) {
        column.hint = Some(hint.clone());
    }

    track_value(column, value, pinned, options);

    column.max_length = match (column.type_var.schema_type, column.type_var.length) {
        (SchemaType::String, Some(length)) => Some(length + options.length_pad),
        _ => None,
    };
}

/// Update a column's enum hint with an observed value
fn track_value(
    column: &mut SchemaColumn,
    value: &JsonValue,
    pinned: Option<&[JsonValue]>,
    options: &InferenceOptions,
) {
    if let Some(pinned) = pinned {
        if !value.is_null() && !pinned.contains(value) {
            warn!(
                table = %column.table_name,
                column = %column.column_name,
                %value,
                "Value outside the declared values"
            );
        }
        return;
    }

    let schema_type = column.type_var.schema_type;
    if schema_type != SchemaType::Null && !schema_type.is_enum_eligible() {
        column.enum_values = None;
        return;
    }

    let Some(values) = column.enum_values.as_mut() else {
        return;
    };
    if value.is_null() {
        return;
    }

    // Members of a string column are kept in their text form
    let value = if schema_type == SchemaType::String {
        normalize_members(values);
        text_form(value)
    } else {
        value.clone()
    };
    if values.contains(&value) {
        return;
    }
    if values.len() >= options.enum_max {
        debug!(
            table = %column.table_name,
            column = %column.column_name,
            enum_max = options.enum_max,
            "Column exceeded enum cap"
        );
        column.enum_values = None;
        return;
    }
    values.push(value);
}

/// Rewrite members as text, dropping the duplicates that conversion creates
fn normalize_members(values: &mut Vec<JsonValue>) {
    if values.iter().all(JsonValue::is_string) {
        return;
    }
    let mut seen = Vec::with_capacity(values.len());
    for member in values.drain(..).map(|v| text_form(&v)) {
        if !seen.contains(&member) {
            seen.push(member);
        }
    }
    *values = seen;
}

fn text_form(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::String(_) => value.clone(),
        other => JsonValue::String(other.to_string()),
    }
}
