//! adloc CLI — serve and inspect advertising platform hierarchies.

mod commands;
mod config;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::AdlocConfig;

#[derive(Parser)]
#[command(name = "adloc", version, about = "Advertising platform locator")]
struct Cli {
    /// Configuration file (default: nearest adloc.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP lookup and upload endpoints
    Serve {
        /// Address to listen on (e.g., 127.0.0.1:8080)
        #[arg(long)]
        bind: Option<String>,
        /// Data file to load at startup
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Validate a data file
    Check {
        /// Data file in `name:/path1,/path2` format
        file: PathBuf,
    },
    /// List the platforms covering a location
    Find {
        /// Data file in `name:/path1,/path2` format
        file: PathBuf,
        /// Location to search (e.g., /ru/svrd/revda)
        location: String,
    },
    /// Show the hierarchy as a tree
    Tree {
        /// Data file in `name:/path1,/path2` format
        file: PathBuf,
    },
    /// Print the hierarchy in normalised data-file format
    Export {
        /// Data file in `name:/path1,/path2` format
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let (config, config_dir) = load_config(cli.config.as_deref(), &cwd)?;
    init_logging(&config.log.level);

    match cli.command {
        Commands::Serve { bind, data } => {
            commands::serve::run(&config, &config_dir, bind.as_deref(), data.as_deref())
        }
        Commands::Check { file } => commands::inspect::check(&config, &file),
        Commands::Find { file, location } => commands::inspect::find(&config, &file, &location),
        Commands::Tree { file } => commands::inspect::tree(&config, &file),
        Commands::Export { file } => commands::inspect::export(&config, &file),
    }
}

/// Load the explicit config, or the nearest `adloc.toml`, or defaults.
fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<(AdlocConfig, PathBuf)> {
    if let Some(path) = explicit {
        let config = AdlocConfig::load(path)?;
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.to_path_buf());
        return Ok((config, dir));
    }
    Ok(AdlocConfig::find_and_load(cwd)?
        .unwrap_or_else(|| (AdlocConfig::default(), cwd.to_path_buf())))
}

/// Log to stderr, filtered by `RUST_LOG` or the configured level.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
