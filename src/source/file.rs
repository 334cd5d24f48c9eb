//! File source
//!
//! Reads documents from a file or glob. `.jsonl` files hold one document
//! per line; any other file holds a single document.

use super::types::{DocumentStream, Source, FILE_DRIVER};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::include::expand_glob;
use crate::types::{JsonObject, JsonValue};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File source configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileSourceConfig {
    /// File path or glob pattern (`**` recurses)
    pub path: String,

    /// Static metadata merged into every document before its own metadata
    #[serde(default)]
    pub metadata: JsonObject,
}

impl FileSourceConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            metadata: JsonObject::new(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// Source reading JSON documents from the local filesystem
#[derive(Debug, Clone)]
pub struct FileSource {
    config: FileSourceConfig,
}

impl FileSource {
    pub fn new(config: FileSourceConfig) -> Self {
        Self { config }
    }

    /// Build from a raw driver config (`{path, metadata}`)
    pub fn from_config(config: &JsonValue) -> Result<Self> {
        if config.get("path").is_none() {
            return Err(Error::missing_field("path"));
        }
        let config: FileSourceConfig = serde_json::from_value(config.clone())
            .map_err(|e| Error::invalid_value("source", e.to_string()))?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &FileSourceConfig {
        &self.config
    }

    /// Files currently matched by the configured path
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        expand_glob(&self.config.path)
    }
}

#[async_trait]
impl Source for FileSource {
    fn driver(&self) -> &str {
        FILE_DRIVER
    }

    async fn documents(&self) -> Result<DocumentStream> {
        let files = self.files()?;
        if files.is_empty() {
            return Err(Error::source_failed(
                FILE_DRIVER,
                format!("No files match '{}'", self.config.path),
            ));
        }
        debug!(count = files.len(), path = %self.config.path, "Source files matched");

        let metadata = self.config.metadata.clone();
        let stream = stream::iter(files)
            .then(move |file| {
                let metadata = metadata.clone();
                async move { read_file(file, metadata).await }
            })
            .flat_map(|result| {
                let items: Vec<Result<Document>> = match result {
                    Ok(documents) => documents.into_iter().map(Ok).collect(),
                    Err(e) => vec![Err(e)],
                };
                stream::iter(items)
            });

        Ok(Box::pin(stream))
    }
}

async fn read_file(path: PathBuf, metadata: JsonObject) -> Result<Vec<Document>> {
    let contents = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| read_error(&path, e))?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let is_jsonl = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("jsonl"));

    let raw = if is_jsonl {
        contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(n, line)| {
                serde_json::from_str(line)
                    .map_err(|e| parse_error(&path, &format!("line {}: {e}", n + 1)))
            })
            .collect::<Result<Vec<JsonValue>>>()?
    } else {
        vec![serde_json::from_str(&contents).map_err(|e| parse_error(&path, &e.to_string()))?]
    };

    debug!(file = %name, documents = raw.len(), "Read source file");
    raw.into_iter()
        .map(|value| build_document(value, &metadata, &name))
        .collect()
}

/// Apply static metadata, the document's own metadata, then the file name
fn build_document(value: JsonValue, metadata: &JsonObject, name: &str) -> Result<Document> {
    let mut document = Document::from_value(value)?;
    let own = std::mem::replace(&mut document.metadata, metadata.clone());
    document.merge_metadata(&own);
    document.record_source_name(name);
    Ok(document)
}

fn read_error(path: &Path, e: std::io::Error) -> Error {
    Error::source_failed(
        FILE_DRIVER,
        format!("Failed to read '{}': {e}", path.display()),
    )
}

fn parse_error(path: &Path, message: &str) -> Error {
    Error::source_failed(
        FILE_DRIVER,
        format!("Failed to parse '{}': {message}", path.display()),
    )
}
