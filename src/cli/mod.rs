//! Command-line interface wiring for the `hallticket` binary.
//!
//! This module owns the clap definitions and delegates execution to
//! specialized submodules that encapsulate each workflow.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use hallticket::{Config, Verbosity};

pub mod common;
pub mod config;
pub mod delete;
pub mod download;
pub mod generate;
pub mod list;
pub mod utils;

/// Parsed CLI entrypoint for the `hallticket` binary.
#[derive(Parser, Debug)]
#[command(
    name = "hallticket",
    version,
    about = "Generate, browse and reissue examination hall tickets"
)]
pub struct Cli {
    /// Path to a configuration file.
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Workflow to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Logging verbosity requested by `-q` / `-v`.
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            return Verbosity::Quiet;
        }
        match self.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Trace,
        }
    }
}

/// Workflows made available to operators.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record a student and render their hall ticket.
    Generate(generate::GenerateArgs),
    /// Browse or search stored hall tickets.
    List(list::ListArgs),
    /// Look up a ticket by QR payload or ticket id and roll number, and write it out.
    Download(download::DownloadArgs),
    /// Delete a stored hall ticket and its document.
    Delete(delete::DeleteArgs),
    /// Inspect configuration.
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Execute the requested command.
pub fn run(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Command::Generate(args) => generate::handle(args, &config),
        Command::List(args) => list::handle(args, &config),
        Command::Download(args) => download::handle(args, &config),
        Command::Delete(args) => delete::handle(args, &config),
        Command::Config(cmd) => config::handle(cmd, &config, cli.config.as_deref()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        let cli = Cli::parse_from(["hallticket", "list"]);
        assert_eq!(cli.verbosity(), Verbosity::Normal);

        let cli = Cli::parse_from(["hallticket", "-vv", "list"]);
        assert_eq!(cli.verbosity(), Verbosity::Trace);

        let cli = Cli::parse_from(["hallticket", "list", "-q"]);
        assert_eq!(cli.verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::parse_from([
            "hallticket",
            "generate",
            "--name",
            "A Kumar",
            "--roll",
            "R100",
            "--program",
            "bba",
            "--semester",
            "1st",
            "--exam-date",
            "2024-05-01",
            "--seat",
            "S1",
            "--subject",
            "C1|Intro|2024-05-01",
            "--subject",
            "C2|Accounting|2024-05-03",
        ]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.roll, "R100");
        assert_eq!(args.subjects.len(), 2);
        assert_eq!(args.subjects[1].name, "Accounting");
    }

    #[test]
    fn test_parse_download_with_code() {
        let cli = Cli::parse_from(["hallticket", "download", "--code", "1A2B3C4D:R100"]);
        let Command::Download(args) = cli.command else {
            panic!("expected download");
        };
        assert_eq!(args.code.as_deref(), Some("1A2B3C4D:R100"));
        assert!(args.ticket.is_none());
    }

    #[test]
    fn test_delete_requires_both_keys() {
        assert!(Cli::try_parse_from(["hallticket", "delete", "--roll", "R100"]).is_err());
        assert!(
            Cli::try_parse_from(["hallticket", "delete", "--roll", "R100", "--ticket", "1A2B3C4D"])
                .is_ok()
        );
    }

    #[test]
    fn test_rejects_unknown_semester() {
        let result = Cli::try_parse_from([
            "hallticket",
            "generate",
            "--name",
            "A",
            "--roll",
            "R1",
            "--program",
            "bba",
            "--semester",
            "9th",
            "--exam-date",
            "2024-05-01",
            "--seat",
            "S1",
        ]);
        assert!(result.is_err());
    }
}
