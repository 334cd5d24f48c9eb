//! Ingested documents
//!
//! A document pairs opaque `metadata` with the `data` tree that drives
//! schema inference. Sources guarantee both fields are present.

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

/// Metadata key recording which metadata key holds the originating file name
pub const FILENAME_KEY_MARKER: &str = "__TOSSER_filename_key";

/// Preferred metadata key for the originating file name
pub const DEFAULT_FILENAME_KEY: &str = "file";

/// One unit of ingestion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub metadata: JsonObject,
    pub data: JsonValue,
}

impl Document {
    /// Create a document with empty metadata
    pub fn new(data: JsonValue) -> Self {
        Self {
            metadata: JsonObject::new(),
            data,
        }
    }

    /// Set a metadata entry
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Build a document from a raw `{metadata, data}` value
    ///
    /// Both fields are required and `metadata` must be an object.
    pub fn from_value(value: JsonValue) -> Result<Self> {
        let JsonValue::Object(mut obj) = value else {
            return Err(Error::missing_document_field("data"));
        };

        let data = obj
            .remove("data")
            .ok_or_else(|| Error::missing_document_field("data"))?;

        let metadata = match obj.remove("metadata") {
            Some(JsonValue::Object(metadata)) => metadata,
            Some(JsonValue::Null) | None => return Err(Error::missing_document_field("metadata")),
            Some(_) => {
                return Err(Error::invalid_value(
                    "metadata",
                    "document metadata must be an object",
                ))
            }
        };

        Ok(Self { metadata, data })
    }

    /// Parse a document from JSON text
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Check if the data tree is an array (rejected before traversal)
    pub fn is_root_array(&self) -> bool {
        self.data.is_array()
    }

    /// Merge entries into the metadata, overwriting existing keys
    pub fn merge_metadata(&mut self, entries: &JsonObject) {
        for (key, value) in entries {
            self.metadata.insert(key.clone(), value.clone());
        }
    }

    /// Record the originating file name
    ///
    /// Stored under `file`, prefixed with `_` until the key is free, and the
    /// chosen key is itself recorded under the filename marker.
    pub fn record_source_name(&mut self, name: impl Into<String>) {
        let mut key = DEFAULT_FILENAME_KEY.to_string();
        while self.metadata.contains_key(&key) {
            key.insert(0, '_');
        }
        self.metadata.insert(key.clone(), JsonValue::String(name.into()));
        self.metadata
            .insert(FILENAME_KEY_MARKER.to_string(), JsonValue::String(key));
    }

    /// Originating file name, if a source recorded one
    pub fn source_name(&self) -> Option<&str> {
        let key = self.metadata.get(FILENAME_KEY_MARKER)?.as_str()?;
        self.metadata.get(key)?.as_str()
    }
}
