//! Source trait and shared types

use crate::document::Document;
use crate::error::Result;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// Driver key of the file source
pub const FILE_DRIVER: &str = "file";

/// Driver key of the in-memory source
pub const MEMORY_DRIVER: &str = "memory";

/// Type alias for the document stream returned by `documents()`
pub type DocumentStream = Pin<Box<dyn Stream<Item = Result<Document>> + Send>>;

/// A producer of documents for schema generation
///
/// Every yielded document carries both `metadata` and `data`; a source
/// reports a missing field as an error item instead of skipping it.
#[async_trait]
pub trait Source: Send + Sync {
    /// Registry key of this source's driver
    fn driver(&self) -> &str;

    /// Open the document stream
    async fn documents(&self) -> Result<DocumentStream>;
}
