use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::{debug, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use cli::{Cli, EXIT_ERROR};
use dialogue::config::Config;
use dialogue::tui;

#[tokio::main]
async fn main() {
    // Log panics before the process goes away
    std::panic::set_hook(Box::new(|panic_info| {
        tui::reset_terminal();
        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        std::process::exit(EXIT_ERROR);
    }));

    if let Err(e) = dotenvy::dotenv() {
        debug!("No .env file found or error loading it: {}", e);
    }

    let cli = Cli::parse();

    let config = match Config::init().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(EXIT_ERROR);
        }
    };

    if let Err(e) = init_logging(&config, cli.debug) {
        eprintln!("Failed to initialize logging: {:#}", e);
        std::process::exit(EXIT_ERROR);
    }

    match cli.execute(config).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("Application error: {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(EXIT_ERROR);
        }
    }
}

fn init_logging(config: &Config, debug: bool) -> Result<()> {
    let log_path = config.log_path();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(debug, log_path.is_some()).into());

    let registry = tracing_subscriber::registry().with(env_filter);

    match log_path {
        Some(path) => {
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .try_init()
        }
        None => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}

/// Filter used when `RUST_LOG` is unset. Stderr shares the terminal with the
/// dialog, so only warnings go there.
fn default_filter(debug: bool, to_file: bool) -> &'static str {
    match (debug, to_file) {
        (true, _) => "dialogue=debug",
        (false, true) => "dialogue=info",
        (false, false) => "dialogue=warn",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(false, true), "dialogue=info");
        assert_eq!(default_filter(false, false), "dialogue=warn");
        assert_eq!(default_filter(true, false), "dialogue=debug");
    }
}
