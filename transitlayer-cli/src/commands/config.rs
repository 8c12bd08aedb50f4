//! Configuration CLI commands.
//!
//! Provides `config show` and `config path` for inspecting the settings the
//! replay command will run with.

use clap::Subcommand;
use transitlayer::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Show => run_show(),
        ConfigCommands::Path => run_path(),
    }
}

/// Show every setting, defaults filled in for anything the file omits.
fn run_show() -> Result<(), CliError> {
    let config = ConfigFile::load().map_err(|e| CliError::Config(e.to_string()))?;

    println!("Configuration Settings");
    println!("======================");
    println!();

    match config_file_path() {
        Some(path) if path.exists() => println!("File: {}", path.display()),
        Some(path) => println!("File: {} (not found, using defaults)", path.display()),
        None => println!("File: (no configuration directory on this platform)"),
    }
    println!();

    println!("[layer]");
    println!("  limit = {}", config.layer.limit);
    println!("  name = {}", config.layer.name);
    println!();
    println!("[zoom]");
    println!("  far = {}", config.zoom.far);
    println!("  mid = {}", config.zoom.mid);
    println!("  close = {}", config.zoom.close);

    Ok(())
}

/// Show the configuration file path.
fn run_path() -> Result<(), CliError> {
    match config_file_path() {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => Err(CliError::Config(
            "Could not determine the platform configuration directory".to_string(),
        )),
    }
}
