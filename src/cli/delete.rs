//! Record deletion (`hallticket delete`).

use anyhow::{Context, Result};
use clap::Args;
use hallticket::{Config, Registry};
use tracing::warn;

use crate::cli::utils::confirm;

/// Arguments for `hallticket delete`.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Roll number of the ticket to delete.
    #[arg(long)]
    pub roll: String,
    /// Hall ticket id of the ticket to delete.
    #[arg(long)]
    pub ticket: String,
    /// Skip the confirmation prompt.
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Execute `hallticket delete`.
pub fn handle(args: DeleteArgs, config: &Config) -> Result<()> {
    if !args.yes {
        let prompt = format!(
            "Delete hall ticket {} for roll number {}?",
            args.ticket, args.roll
        );
        if !confirm(&prompt)? {
            println!("Aborted.");
            return Ok(());
        }
    }

    let mut registry = Registry::open(config);
    let deletion = registry
        .delete(&args.roll, &args.ticket)
        .context("Failed to delete hall ticket")?;

    if deletion.removed == 0 {
        warn!(
            "No record matched roll number {} and hall ticket {}.",
            args.roll, args.ticket
        );
    } else {
        println!("Hall ticket deleted successfully!");
    }
    if deletion.document_removed {
        println!("Removed {}", registry.document_path(&args.roll, &args.ticket).display());
    }

    match registry.count() {
        Ok(count) => println!("{count} hall ticket(s) on record."),
        Err(err) => warn!("could not reload records: {err}"),
    }
    Ok(())
}
