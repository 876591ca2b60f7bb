//! Ticket generation (`hallticket generate`).

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use hallticket::{Config, RawSubjects, Registry, Subject, SubjectEntry, TicketForm, parse_subjects};
use tracing::warn;

use crate::cli::common::{ProgramArg, SemesterArg};
use crate::cli::utils::{parse_date_arg, parse_subject_arg, read_text_arg, write_output};

/// Arguments for `hallticket generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Student's full name.
    #[arg(long)]
    pub name: String,
    /// Roll number; a new ticket replaces any earlier one for the same roll.
    #[arg(long)]
    pub roll: String,
    #[arg(long, value_enum)]
    pub program: ProgramArg,
    #[arg(long, value_enum)]
    pub semester: SemesterArg,
    /// Examination date (YYYY-MM-DD or DD-MM-YYYY).
    #[arg(long = "exam-date", value_parser = parse_date_arg)]
    pub exam_date: NaiveDate,
    #[arg(long)]
    pub seat: String,
    /// Subject as `CODE|NAME|DATE`; repeat for each subject.
    #[arg(long = "subject", value_parser = parse_subject_arg)]
    pub subjects: Vec<Subject>,
    /// Read subjects from a JSON or comma-separated file (`-` for stdin).
    #[arg(long = "subjects-from")]
    pub subjects_from: Option<PathBuf>,
    /// Also copy the PDF here (`-` for stdout).
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

/// Execute `hallticket generate`.
pub fn handle(args: GenerateArgs, config: &Config) -> Result<()> {
    let mut entries: Vec<SubjectEntry> = args.subjects.into_iter().map(SubjectEntry::from).collect();
    if let Some(path) = &args.subjects_from {
        let text = read_text_arg(path)?;
        entries.extend(parse_subjects(&text));
    }

    let form = TicketForm {
        name: args.name,
        roll_number: args.roll,
        program: args.program.into(),
        semester: args.semester.into(),
        exam_date: args.exam_date,
        seat_number: args.seat,
        subjects: RawSubjects::Entries(entries),
    };

    let mut registry = Registry::open(config);
    let generated = registry
        .generate(form)
        .context("failed to generate hall ticket")?;

    if !generated.stored {
        warn!("Could not save to database, but the hall ticket was still generated.");
    }
    if !generated.ticket.code_embedded {
        warn!("The hall ticket was generated without its QR code.");
    }
    if generated.ticket.subjects_omitted > 0 {
        warn!(
            "{} subject(s) did not fit on the page and were left off.",
            generated.ticket.subjects_omitted
        );
    }

    let summary = format!(
        "Hall Ticket ID: {}\nQR payload:     {}\nDocument:       {}",
        generated.record.hall_ticket_id,
        generated.ticket.code_payload,
        generated.document_path.display()
    );
    match &args.output {
        // PDF bytes own stdout; keep the summary out of the stream.
        Some(output) if output.as_os_str() == "-" => {
            write_output(output, &generated.ticket.pdf)?;
            eprintln!("{summary}");
        }
        Some(output) => {
            write_output(output, &generated.ticket.pdf)?;
            println!("{summary}");
        }
        None => println!("{summary}"),
    }
    Ok(())
}
