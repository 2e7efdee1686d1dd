//! Command-line and environment configuration.

use anyhow::{Context, Result};
use clap::Parser;
use ecofleet_core::default_log_level;
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "ecofleet";
const DB_FILE_NAME: &str = "ecofleet.sqlite3";

/// Console manager for sustainable-energy projects.
#[derive(Debug, Parser)]
#[command(name = "ecofleet", version, about)]
pub struct Cli {
    /// SQLite database file
    #[arg(long, env = "ECOFLEET_DB")]
    pub db: Option<PathBuf>,

    /// Directory for rolling log files
    #[arg(long, env = "ECOFLEET_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "ECOFLEET_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory where exports are written
    #[arg(long, env = "ECOFLEET_EXPORT_DIR")]
    pub export_dir: Option<PathBuf>,
}

/// Fully resolved runtime settings; every path is absolute.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub export_dir: PathBuf,
}

impl Cli {
    pub fn into_config(self) -> Result<AppConfig> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| cwd.clone())
            .join(APP_DIR_NAME);

        Ok(AppConfig {
            db_path: absolute(&cwd, self.db.unwrap_or_else(|| data_dir.join(DB_FILE_NAME))),
            log_dir: absolute(&cwd, self.log_dir.unwrap_or_else(|| data_dir.join("logs"))),
            log_level: self
                .log_level
                .unwrap_or_else(|| default_log_level().to_string()),
            export_dir: absolute(&cwd, self.export_dir.unwrap_or_else(|| cwd.clone())),
        })
    }
}

fn absolute(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}
