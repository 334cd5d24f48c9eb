//! In-memory source

use super::types::{DocumentStream, Source, MEMORY_DRIVER};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::types::JsonValue;
use async_trait::async_trait;
use futures::stream;

/// Source yielding pre-built documents
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: Vec<Document>,
}

impl MemorySource {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Build from a raw driver config (`{documents: [{metadata, data}, ...]}`)
    pub fn from_config(config: &JsonValue) -> Result<Self> {
        let items = config
            .get("documents")
            .and_then(JsonValue::as_array)
            .ok_or_else(|| Error::missing_field("documents"))?;

        let documents = items
            .iter()
            .cloned()
            .map(Document::from_value)
            .collect::<Result<_>>()?;
        Ok(Self { documents })
    }

    #[must_use]
    pub fn with_document(mut self, document: Document) -> Self {
        self.documents.push(document);
        self
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[async_trait]
impl Source for MemorySource {
    fn driver(&self) -> &str {
        MEMORY_DRIVER
    }

    async fn documents(&self) -> Result<DocumentStream> {
        let documents = self.documents.clone();
        Ok(Box::pin(stream::iter(documents.into_iter().map(Ok))))
    }
}
