//! Recursive `@include` expansion

use crate::error::{Error, Result};
use crate::types::{JsonObject, JsonValue};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default key whose value names files to merge into the enclosing mapping
pub const INCLUDE_KEYWORD: &str = "@include";

/// Builds one configuration tree from a file and everything it includes
///
/// An include directive is a string or a list of glob patterns, resolved
/// relative to the including file. Every matched file is expanded in turn
/// and its top-level keys are merged into the mapping that held the
/// directive, overwriting keys already present.
#[derive(Debug, Clone)]
pub struct ConfigExtender {
    path: PathBuf,
    include_keyword: String,
}

impl ConfigExtender {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            include_keyword: INCLUDE_KEYWORD.to_string(),
        }
    }

    /// Use a different include keyword
    #[must_use]
    pub fn with_include_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.include_keyword = keyword.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the root file and expand every include, recursively
    pub fn render(&self) -> Result<JsonValue> {
        let mut stack = Vec::new();
        self.include(&self.path, &mut stack)
    }

    fn include(&self, path: &Path, stack: &mut Vec<PathBuf>) -> Result<JsonValue> {
        let canonical = fs::canonicalize(path).map_err(|_| Error::FileNotFound {
            path: path.display().to_string(),
        })?;

        if stack.contains(&canonical) {
            let chain = stack
                .iter()
                .chain(std::iter::once(&canonical))
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(Error::IncludeCycle { chain });
        }

        stack.push(canonical);
        let mut data = read_config(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let result = self.expand(&mut data, base, stack);
        stack.pop();
        result?;

        Ok(data)
    }

    fn expand(&self, value: &mut JsonValue, base: &Path, stack: &mut Vec<PathBuf>) -> Result<()> {
        let JsonValue::Object(obj) = value else {
            return Ok(());
        };

        for (key, child) in obj.iter_mut() {
            if key != &self.include_keyword {
                self.expand(child, base, stack)?;
            }
        }

        let Some(directive) = obj.shift_remove(&self.include_keyword) else {
            return Ok(());
        };

        for pattern in include_patterns(&self.include_keyword, directive)? {
            let full = base.join(&pattern);
            let full = full.to_string_lossy();
            let files = expand_glob(&full)?;

            if files.is_empty() {
                warn!(pattern = %full, "No files found for include pattern");
                continue;
            }

            for file in files {
                debug!(file = %file.display(), "Including config file");
                merge_into(obj, self.include(&file, stack)?, &file)?;
            }
        }

        Ok(())
    }
}

fn include_patterns(keyword: &str, directive: JsonValue) -> Result<Vec<String>> {
    match directive {
        JsonValue::String(pattern) => Ok(vec![pattern]),
        JsonValue::Array(items) => items
            .into_iter()
            .map(|item| match item {
                JsonValue::String(pattern) => Ok(pattern),
                _ => Err(Error::invalid_value(keyword, "include entries must be strings")),
            })
            .collect(),
        JsonValue::Null => Ok(Vec::new()),
        _ => Err(Error::invalid_value(
            keyword,
            "expected a glob pattern or a list of glob patterns",
        )),
    }
}

fn merge_into(target: &mut JsonObject, included: JsonValue, file: &Path) -> Result<()> {
    match included {
        JsonValue::Object(entries) => {
            for (key, value) in entries {
                target.insert(key, value);
            }
            Ok(())
        }
        JsonValue::Null => Ok(()),
        _ => Err(Error::config(format!(
            "Included file '{}' must contain a mapping",
            file.display()
        ))),
    }
}

/// Read a YAML or JSON config file (`.json` is JSON, anything else YAML)
pub fn read_config(path: &Path) -> Result<JsonValue> {
    let contents = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read config file '{}': {e}",
            path.display()
        ))
    })?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        Ok(serde_json::from_str(&contents)?)
    } else {
        Ok(serde_yaml::from_str(&contents)?)
    }
}

/// Expand a file path or glob pattern into matching files, sorted
///
/// `**` matches directories recursively.
pub fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let direct = Path::new(pattern);
    if direct.is_file() {
        return Ok(vec![direct.to_path_buf()]);
    }

    let entries = glob::glob(pattern).map_err(|e| Error::Glob {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Error accessing path"),
        }
    }

    files.sort();
    Ok(files)
}
