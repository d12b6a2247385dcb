use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use kost::cli::commands;
use kost::config::{Config, BASE_URL_ENV};

#[derive(Parser)]
#[command(name = "kost")]
#[command(about = "Kost - find foods in the nutrition database and compare their nutrients")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), ", courtesy of Kernelle Software"))]
struct Cli {
  /// Base URL of the nutrition service
  #[arg(long, global = true, env = BASE_URL_ENV)]
  base_url: Option<String>,

  /// JSON configuration file
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  /// Enable verbose logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Search both panels once for the given food name
  Search {
    /// Food name (space-separated words are joined)
    #[arg(required = true)]
    terms: Vec<String>,
    /// Page of results to show, starting at 1
    #[arg(short, long, default_value = "1")]
    page: usize,
  },
  /// Resolve several food names at once and print their nutrients
  Process {
    /// Food names, one per row
    #[arg(required = true)]
    names: Vec<String>,
  },
  /// Interactive search-as-you-type session
  Session,
}

async fn handle(command: Command, config: &Config) -> Result<()> {
  match command {
    Command::Search { terms, page } => commands::search(config, &terms, page).await,
    Command::Process { names } => commands::process(config, &names).await,
    Command::Session => commands::session(config).await,
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  // Logs go to stderr so they do not interleave with result tables
  let filter = if cli.verbose {
    EnvFilter::new("kost=debug,info")
  } else {
    EnvFilter::new("kost=info,warn")
  };
  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(filter)
    .init();

  let config = Config::load(cli.config.as_deref(), cli.base_url.as_deref())?;
  tracing::debug!(base_url = %config.base_url, "configuration loaded");

  handle(cli.command, &config).await
}
