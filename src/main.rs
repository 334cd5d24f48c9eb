// Allow common clippy pedantic lints
#![allow(clippy::must_use_candidate)]
#![allow(clippy::unused_async)]

//! Tosser CLI
//!
//! Command-line interface for schema generation

use clap::Parser;
use tosser::cli::{Cli, Runner};
use tosser::{LogLevel, Settings, SettingsArgs};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = match Settings::from_env(SettingsArgs {
        log_level: cli.verbose.then_some(LogLevel::Debug),
        ..SettingsArgs::default()
    }) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    // Initialize logging
    let level: tracing::Level = settings.log_level.into();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let runner = Runner::new(cli);

    if let Err(e) = runner.run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
