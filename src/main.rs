//! gempeek - Live preview for gemtext and Markdown files.

mod actor;
mod cli;
mod config;
mod core;
mod embed;
mod gemtext;
mod logger;
mod markdown;
mod preview;
mod reload;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::{PreviewConfig, init_config};

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    init_config(PreviewConfig::load(&cli)?);

    match &cli.command {
        Commands::Serve { file, .. } => cli::serve::serve(file),
        Commands::Render { file, previous } => cli::render::render(file, previous.as_deref()),
    }
}
