//! SkillBridge - Application entry point
//!
//! Dispatches `serve`, `migrate` and `jobs` after loading `.env` and logging.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use skillbridge::{
    cli::{Cli, Commands},
    commands,
    config::Config,
};

const DEFAULT_LOG_FILTER: &str = "skillbridge=info,tower_http=info,sqlx=warn";

#[tokio::main]
async fn main() -> ExitCode {
    // `.env` may carry RUST_LOG, so it is read before the subscriber starts
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::from_env();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "SkillBridge starting");
    tracing::debug!(?config, "Configuration loaded");

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::execute(args, config).await,
        Commands::Migrate(args) => commands::migrate::execute(args, config).await,
        Commands::Jobs(args) => commands::jobs::execute(args, config).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}

/// `--verbose` wins over RUST_LOG.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("skillbridge=debug,tower_http=debug,sqlx=info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(filter)
        .init();
}
