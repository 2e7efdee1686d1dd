//! EcoFleet interactive console entry point.

mod app;
mod config;
mod terminal;

use anyhow::{Context, Result};
use clap::Parser;
use ecofleet_core::init_logging;

use app::App;
use config::Cli;
use terminal::TerminalConsole;

fn main() -> Result<()> {
    let config = Cli::parse().into_config()?;

    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("warning: file logging disabled: {err}");
    }

    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create database directory {}", parent.display())
        })?;
    }

    App::new(config, TerminalConsole::new()).run();
    Ok(())
}
