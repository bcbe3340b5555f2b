//! ImageScout - find the stock photo that matches a Chinese description.
//!
//! ImageScout turns a free-form Chinese description into an English search
//! keyword, searches Unsplash, filters the results with a vision model, and
//! highlights the single best match.
//!
//! # Usage
//!
//! ```bash
//! # Run the HTTP API (default command)
//! imagescout serve --port 3000
//!
//! # One-off search printed as JSON
//! imagescout search "夕阳下的长城" --pretty
//!
//! # View configuration
//! imagescout config show
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use imagescout_core::Config;
use std::path::{Path, PathBuf};

mod cli;
mod logging;
mod server;

/// ImageScout - AI-assisted stock photo search.
#[derive(Parser, Debug)]
#[command(name = "imagescout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    /// Config file to use instead of the default location
    #[arg(short, long, global = true, env = "IMAGESCOUT_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(cli::serve::ServeArgs),

    /// Run one search and print the result as JSON
    Search(cli::search::SearchArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Variables from .env feed clap env fallbacks, ${VAR} references and overrides.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = load_config(cli.config.as_deref())?;
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("ImageScout v{}", imagescout_core::VERSION);

    match cli.command {
        None => cli::serve::execute(cli::serve::ServeArgs::default(), config).await,
        Some(Commands::Serve(args)) => cli::serve::execute(args, config).await,
        Some(Commands::Search(args)) => cli::search::execute(args, config).await,
        Some(Commands::Config(args)) => {
            cli::config::execute(args, config, cli.config.as_deref()).await
        }
    }
}

fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = match explicit {
        Some(path) if path.exists() => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        Some(path) => {
            eprintln!(
                "Warning: Config file {} does not exist, using default configuration.",
                path.display()
            );
            Config::default()
        }
        None => match Config::load() {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to load config: {e}\n  \
                     Using default configuration. Check your config file with `imagescout config path`."
                );
                Config::default()
            }
        },
    };
    config
        .apply_env_overrides()
        .context("Invalid environment override")?;
    Ok(config)
}
