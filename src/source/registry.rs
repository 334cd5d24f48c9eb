//! Source driver registry
//!
//! Maps a driver key (`file`, `memory`, ...) to a factory building the
//! source from its raw config.

use super::file::FileSource;
use super::memory::MemorySource;
use super::types::{Source, FILE_DRIVER, MEMORY_DRIVER};
use crate::error::{Error, Result};
use crate::types::JsonValue;
use std::collections::HashMap;
use std::fmt;

/// Builds a source from its driver config
pub type SourceFactory = fn(&JsonValue) -> Result<Box<dyn Source>>;

/// Registry of source drivers
#[derive(Clone, Default)]
pub struct SourceRegistry {
    factories: HashMap<String, SourceFactory>,
}

impl SourceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in drivers
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(FILE_DRIVER, file_source);
        registry.register(MEMORY_DRIVER, memory_source);
        registry
    }

    /// Register (or replace) a driver
    pub fn register(&mut self, driver: impl Into<String>, factory: SourceFactory) {
        self.factories.insert(driver.into(), factory);
    }

    /// Check if a driver is registered
    pub fn contains(&self, driver: &str) -> bool {
        self.factories.contains_key(driver)
    }

    /// Build a source for a driver
    pub fn create(&self, driver: &str, config: &JsonValue) -> Result<Box<dyn Source>> {
        let factory = self.factories.get(driver).ok_or_else(|| {
            Error::config(format!(
                "Unknown source driver '{driver}'. Available drivers: {}",
                self.drivers().join(", ")
            ))
        })?;
        factory(config)
    }

    /// Registered driver keys, sorted
    pub fn drivers(&self) -> Vec<&str> {
        let mut drivers: Vec<_> = self.factories.keys().map(String::as_str).collect();
        drivers.sort_unstable();
        drivers
    }
}

impl fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceRegistry")
            .field("drivers", &self.drivers())
            .finish()
    }
}

fn file_source(config: &JsonValue) -> Result<Box<dyn Source>> {
    Ok(Box::new(FileSource::from_config(config)?))
}

fn memory_source(config: &JsonValue) -> Result<Box<dyn Source>> {
    Ok(Box::new(MemorySource::from_config(config)?))
}
