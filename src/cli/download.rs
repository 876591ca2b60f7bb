//! Lookup and reissue (`hallticket download`).

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Args;
use hallticket::{Config, Registry, code};
use tracing::{error, info};

use crate::cli::utils::write_output;

/// Arguments for `hallticket download`.
#[derive(Args, Debug)]
pub struct DownloadArgs {
    /// Scanned QR payload (`<ticket id>:<roll number>`); takes precedence.
    #[arg(long)]
    pub code: Option<String>,
    /// Hall ticket id.
    #[arg(long)]
    pub ticket: Option<String>,
    /// Roll number.
    #[arg(long)]
    pub roll: Option<String>,
    /// Also copy the PDF here (`-` for stdout).
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

/// Pick the (ticket id, roll number) pair to look up.
///
/// A valid code payload wins. An invalid one is reported and the explicit
/// arguments are used instead.
fn resolve_keys(args: &DownloadArgs) -> (Option<String>, Option<String>) {
    if let Some(payload) = args.code.as_deref().filter(|p| !p.trim().is_empty()) {
        match code::decode(payload) {
            Ok((ticket, roll)) => {
                info!("QR code data processed: ticket {ticket}, roll {roll}");
                return (Some(ticket), Some(roll));
            }
            Err(err) => error!(
                "Invalid QR code data ({err}). Please enter your Hall Ticket ID and Roll Number manually."
            ),
        }
    }
    (args.ticket.clone(), args.roll.clone())
}

/// Execute `hallticket download`.
pub fn handle(args: DownloadArgs, config: &Config) -> Result<()> {
    let (ticket, roll) = resolve_keys(&args);
    let (Some(ticket), Some(roll)) = (
        ticket.filter(|t| !t.trim().is_empty()),
        roll.filter(|r| !r.trim().is_empty()),
    ) else {
        return Err(anyhow!("Please enter both Hall Ticket ID and Roll Number."));
    };

    let registry = Registry::open(config);
    let record = match registry.lookup(&ticket, &roll) {
        Ok(record) => record,
        Err(err) if err.is_not_found() => {
            return Err(anyhow!("No hall ticket found with the provided details."));
        }
        Err(err) => return Err(err.into()),
    };

    let (hall_ticket, path) = registry.download(&record)?;
    let to_stdout = args.output.as_deref().is_some_and(|o| o.as_os_str() == "-");
    if let Some(output) = &args.output {
        write_output(output, &hall_ticket.pdf)?;
    }
    if to_stdout {
        eprintln!("Hall Ticket found! Document: {}", path.display());
    } else {
        println!("Hall Ticket found! Document: {}", path.display());
    }
    Ok(())
}
