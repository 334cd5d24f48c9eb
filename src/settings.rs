//! Runtime settings
//!
//! Each setting resolves as explicit argument, then `TOSSER_*` environment
//! variable, then default.

use crate::error::{Error, Result};
use crate::schema::{
    InferenceOptions, DEFAULT_ENUM_MAX, DEFAULT_LENGTH_PAD, SCHEMA_DEFAULT_FILE_NAME,
    SCHEMA_FILE_EXT,
};
use crate::types::LogLevel;
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_WORK_DIR: &str = "TOSSER_WORK_DIR";
pub const ENV_LOG_LEVEL: &str = "TOSSER_LOG_LEVEL";
pub const ENV_ENUM_MAX: &str = "TOSSER_ENUM_MAX";
pub const ENV_LENGTH_PAD: &str = "TOSSER_LENGTH_PAD";

/// Explicit values, typically from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsArgs {
    pub work_dir: Option<PathBuf>,
    pub log_level: Option<LogLevel>,
    pub enum_max: Option<usize>,
    pub length_pad: Option<usize>,
}

/// Resolved runtime settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Directory the schema file is written to and read from
    pub work_dir: PathBuf,
    pub log_level: LogLevel,
    pub enum_max: usize,
    pub length_pad: usize,
    pub schema_file_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
            log_level: LogLevel::default(),
            enum_max: DEFAULT_ENUM_MAX,
            length_pad: DEFAULT_LENGTH_PAD,
            schema_file_name: format!("{SCHEMA_DEFAULT_FILE_NAME}.{SCHEMA_FILE_EXT}"),
        }
    }
}

impl Settings {
    /// Resolve against the process environment
    pub fn from_env(args: SettingsArgs) -> Result<Self> {
        Self::resolve(args, |name| std::env::var(name).ok())
    }

    /// Resolve with an explicit environment lookup
    pub fn resolve<F>(args: SettingsArgs, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let work_dir = match args.work_dir {
            Some(dir) => dir,
            None => env(ENV_WORK_DIR).map_or(defaults.work_dir, PathBuf::from),
        };

        Ok(Self {
            work_dir,
            log_level: pick(args.log_level, &env, ENV_LOG_LEVEL, defaults.log_level)?,
            enum_max: pick(args.enum_max, &env, ENV_ENUM_MAX, defaults.enum_max)?,
            length_pad: pick(args.length_pad, &env, ENV_LENGTH_PAD, defaults.length_pad)?,
            schema_file_name: defaults.schema_file_name,
        })
    }

    /// Path of the schema file inside the work directory
    pub fn schema_path(&self) -> PathBuf {
        self.work_dir.join(&self.schema_file_name)
    }

    pub fn inference_options(&self) -> InferenceOptions {
        InferenceOptions::new()
            .with_enum_max(self.enum_max)
            .with_length_pad(self.length_pad)
    }
}

fn pick<T, F>(arg: Option<T>, env: &F, name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = arg {
        return Ok(value);
    }
    match env(name) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| {
            Error::invalid_value(name, format!("'{raw}' is not valid: {e}"))
        }),
        None => Ok(default),
    }
}
