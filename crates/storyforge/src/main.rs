//! StoryForge CLI - story rendering and preview toolchain.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "storyforge")]
#[command(about = "Render stories into standalone AMP HTML documents")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to storyforge.toml config file
    #[arg(short, long, default_value = "storyforge.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a config file and a sample story
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Render a single story document
    Render {
        /// Story document to render
        file: PathBuf,

        /// Write output here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render every story and the dashboard into an output directory
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start the preview server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let config = config::ConfigFile::load(&cli.config)?;

    // Execute command
    match cli.command {
        Commands::Init { force } => {
            commands::init::run(force)?;
        }
        Commands::Render { file, output } => {
            commands::render::run(&config, &file, output)?;
        }
        Commands::Build { output } => {
            commands::build::run(&config, output)?;
        }
        Commands::Serve { port, no_open } => {
            commands::serve::run(&config, port, no_open).await?;
        }
    }

    Ok(())
}
