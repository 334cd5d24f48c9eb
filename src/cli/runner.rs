//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::error::{Error, Result, ResultExt};
use crate::ingest::Ingest;
use crate::mapping::{load_map, TosserMap};
use crate::schema::{TosserSchema, SCHEMA_DEFAULT_FILE_NAME};
use crate::settings::{Settings, SettingsArgs};
use crate::source::SourceRegistry;
use serde_json::json;
use std::path::Path;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
    registry: SourceRegistry,
}

impl Runner {
    /// Create a runner with the built-in source drivers
    pub fn new(cli: Cli) -> Self {
        Self::with_registry(cli, SourceRegistry::with_builtins())
    }

    /// Create a runner with a custom driver registry
    pub fn with_registry(cli: Cli, registry: SourceRegistry) -> Self {
        Self { cli, registry }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Generate {
                path,
                driver,
                resume,
                enum_max,
                length_pad,
            } => {
                let settings = self.settings(*enum_max, *length_pad)?;
                self.generate(&settings, path, driver, *resume).await
            }
            Commands::Show { schema, arrow } => {
                let settings = self.settings(None, None)?;
                let path = schema.clone().unwrap_or_else(|| settings.schema_path());
                self.show(&settings, &path, *arrow)
            }
            Commands::Validate => self.validate(),
            Commands::Drivers => {
                self.drivers();
                Ok(())
            }
        }
    }

    fn settings(&self, enum_max: Option<usize>, length_pad: Option<usize>) -> Result<Settings> {
        Settings::from_env(SettingsArgs {
            work_dir: self.cli.work_dir.clone(),
            log_level: None,
            enum_max,
            length_pad,
        })
    }

    /// Load the mapping policy named by `--map`
    fn load_policy(&self) -> Result<TosserMap> {
        let path = self
            .cli
            .map
            .as_ref()
            .ok_or_else(|| Error::config("Mapping policy not specified (use -m flag)"))?;
        load_map(path).with_context(|| format!("Failed to load mapping policy '{}'", path.display()))
    }

    /// Fold documents into the schema and write it to the work directory
    async fn generate(
        &self,
        settings: &Settings,
        path: &str,
        driver: &str,
        resume: bool,
    ) -> Result<()> {
        let policy = self.load_policy()?;
        let options = settings.inference_options();
        let schema_path = settings.schema_path();

        let mut schema = if resume && schema_path.exists() {
            info!(path = %schema_path.display(), "Resuming from existing schema");
            TosserSchema::load(&schema_path, policy, options)?
        } else {
            TosserSchema::with_options(policy, options)
                .with_file_name(settings.schema_file_name.clone())
        };

        let source = self.registry.create(driver, &json!({ "path": path }))?;

        let mut ingest = Ingest::new();
        let report = if resume {
            ingest.resume(&mut schema, source.as_ref()).await?
        } else {
            ingest.generate(&mut schema, source.as_ref()).await?
        };

        let written = schema
            .write(&settings.work_dir)
            .await
            .context("Failed to write schema")?;

        println!(
            "Schema '{}': {report} -> {}",
            schema.name(),
            written.display()
        );
        Ok(())
    }

    /// Print a persisted schema
    ///
    /// Without `--map` the schema is read under a default policy named after
    /// the file, which keeps the default key template.
    fn show(&self, settings: &Settings, path: &Path, arrow: bool) -> Result<()> {
        let policy = match self.cli.map {
            Some(_) => self.load_policy()?,
            None => {
                let name = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .unwrap_or(SCHEMA_DEFAULT_FILE_NAME);
                TosserMap::new(name, name)
            }
        };
        let schema = TosserSchema::load(path, policy, settings.inference_options())?;

        if !arrow {
            println!("{}", schema.render_string()?);
            return Ok(());
        }

        for (table, arrow_schema) in schema.to_arrow_schemas() {
            println!("{table}");
            for field in arrow_schema.fields() {
                let nullable = if field.is_nullable() { "" } else { " not null" };
                println!("  {}: {}{nullable}", field.name(), field.data_type());
            }
        }
        Ok(())
    }

    /// Validate the mapping policy
    fn validate(&self) -> Result<()> {
        let policy = self.load_policy()?;
        println!(
            "Mapping policy '{}' is valid: root table '{}', {} mapped tables",
            policy.schema,
            policy.root_table,
            policy.tables.len()
        );
        Ok(())
    }

    /// List registered source drivers
    fn drivers(&self) {
        for driver in self.registry.drivers() {
            println!("{driver}");
        }
    }
}
