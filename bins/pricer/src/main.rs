//! Pricebook command-line tool.
//!
//! Loads rates from the configured provider and converts, rounds and marks
//! up prices.

use std::process::ExitCode;

use clap::Parser as _;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pricebook_shared::{AppConfig, AppError};

mod cli;
mod commands;

use cli::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Before config loading, so --help never depends on it
    let args = Args::parse();

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pricer=info,pricebook_core=info,pricebook_rates=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let err = commands::into_app_error(err);
            eprintln!("Error [{}]: {err}", err.error_code());
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    // Load configuration
    let config = AppConfig::load().map_err(AppError::from)?;
    config.validate()?;

    args.evaluate(&config).await
}
