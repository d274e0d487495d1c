use std::io;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, warn};

use regchange_cli::cli::Cli;
use regchange_cli::config::AppConfig;
use regchange_cli::{build_registry, logging, session};
use regchange_core::WizardController;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_default_logging();

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;

    if let Some(level) = &config.logging.level {
        if logging::env_filter_set() {
            debug!(level = %level, "RUST_LOG set; config log level ignored");
        } else if let Err(e) = logging::set_log_level(level) {
            warn!(error = %e, "ignoring config log level");
        }
    }
    if let Some(path) = cli.log_file.as_ref().or(config.logging.file.as_ref()) {
        logging::enable_file_logging(path)?;
    }

    if let Some(backend) = cli.backend {
        config.service.backend = backend;
    }
    if let Some(db) = cli.db {
        config.service.connection_string = db;
    }

    debug!(
        backend = %config.service.backend,
        connection = %config.service.connection_string,
        "opening backend"
    );
    let registry = build_registry();
    let service = registry
        .create(&config.service)
        .await
        .with_context(|| format!("Failed to open '{}' backend", config.service.backend))?;

    let mut controller = WizardController::new(service, config.wizard);
    let mut stdout = io::stdout().lock();
    session::run(&cli.command, &mut controller, cli.dry_run, &mut stdout).await
}
