//! Error types for Tosser
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for Tosser
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Include cycle detected: {chain}")]
    IncludeCycle { chain: String },

    #[error("Invalid glob pattern '{pattern}': {message}")]
    Glob { pattern: String, message: String },

    // ============================================================================
    // Generation Errors
    // ============================================================================
    #[error("Cannot {operation} while schema is {state}")]
    Lifecycle { operation: String, state: String },

    #[error("Unsupported document structure at '{trail}': {message}")]
    UnsupportedStructure { trail: String, message: String },

    // ============================================================================
    // Source Errors
    // ============================================================================
    #[error("Document missing required field: {field}")]
    MissingDocumentField { field: String },

    #[error("Source '{driver}' failed: {message}")]
    Source { driver: String, message: String },

    // ============================================================================
    // Persistence Errors
    // ============================================================================
    #[error("Schema file '{path}': {message}")]
    SchemaFile { path: String, message: String },

    #[error("Unsupported schema file version {found} (expected {expected})")]
    UnsupportedSchemaVersion { found: i64, expected: i64 },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a lifecycle violation error
    pub fn lifecycle(operation: impl Into<String>, state: impl Into<String>) -> Self {
        Self::Lifecycle {
            operation: operation.into(),
            state: state.into(),
        }
    }

    /// Create an unsupported structure error
    pub fn unsupported(trail: impl Into<String>, message: impl Into<String>) -> Self {
        Self::UnsupportedStructure {
            trail: trail.into(),
            message: message.into(),
        }
    }

    /// Create a missing document field error
    pub fn missing_document_field(field: impl Into<String>) -> Self {
        Self::MissingDocumentField {
            field: field.into(),
        }
    }

    /// Create a source error
    pub fn source_failed(driver: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Source {
            driver: driver.into(),
            message: message.into(),
        }
    }

    /// Create a schema file error
    pub fn schema_file(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaFile {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if this error is a call-order mistake by the caller
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Error::Lifecycle { .. })
    }

    /// Check if this error rejected a document for its shape
    pub fn is_unsupported_structure(&self) -> bool {
        matches!(self, Error::UnsupportedStructure { .. })
    }
}

/// Result type alias for Tosser
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
