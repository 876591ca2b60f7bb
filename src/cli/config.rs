//! Configuration inspection (`hallticket config ...`).

use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};
use hallticket::Config;

/// Supported `hallticket config` subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration.
    Show(ConfigShowArgs),
    /// Print the configuration file path in use.
    Path,
}

/// Arguments for `hallticket config show`.
#[derive(Args, Debug)]
pub struct ConfigShowArgs {
    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Execute a config command.
pub fn handle(command: ConfigCommand, config: &Config, explicit_path: Option<&Path>) -> Result<()> {
    match command {
        ConfigCommand::Show(args) => show(args, config),
        ConfigCommand::Path => {
            let path = explicit_path
                .map(Path::to_path_buf)
                .unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn show(args: ConfigShowArgs, config: &Config) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(config)?);
        return Ok(());
    }
    println!("database_path:  {}", config.database_path().display());
    println!("artifact_dir:   {}", config.artifact_dir().display());
    println!("institution:    {}", config.ticket.institution);
    println!("subtitle:       {}", config.ticket.subtitle);
    println!("code_size_px:   {}", config.ticket.code_size_px);
    Ok(())
}
