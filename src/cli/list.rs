//! Browsing and search (`hallticket list`).

use std::fmt::Write as _;

use anyhow::Result;
use clap::Args;
use hallticket::{Config, Registry, StudentRecord, SubjectEntry};
use tracing::error;

/// Arguments for `hallticket list`.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Case-insensitive filter on name, roll number or ticket id.
    pub term: Option<String>,
    /// Emit records as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute `hallticket list`.
pub fn handle(args: ListArgs, config: &Config) -> Result<()> {
    let registry = Registry::open(config);
    let term = args.term.as_deref().unwrap_or("");
    let browse = registry.browse(term);
    if let Some(err) = &browse.load_error {
        error!("Error loading database: {err}");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&browse.records)?);
        return Ok(());
    }

    if browse.records.is_empty() {
        if term.trim().is_empty() {
            println!("No hall tickets have been generated yet.");
        } else {
            println!("No matching records found.");
        }
        return Ok(());
    }

    println!("Found {} records", browse.records.len());
    for record in &browse.records {
        print!("\n{}", format_record(record));
    }
    Ok(())
}

/// Multi-line listing for one record, subject table included.
fn format_record(record: &StudentRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} - {}", record.name, record.roll_number);
    for (label, value) in [
        ("Program:", record.program.label().to_string()),
        ("Semester:", record.semester.to_string()),
        ("Exam Date:", record.exam_date_display()),
        ("Seat Number:", record.seat_number.clone()),
        ("Hall Ticket ID:", record.hall_ticket_id.to_string()),
    ] {
        let _ = writeln!(out, "  {label:<16}{value}");
    }

    if record.subjects.is_empty() {
        return out;
    }
    let _ = writeln!(out, "  Examination Subjects:");
    let _ = writeln!(out, "    {:<12} {:<40} {}", "Subject Code", "Subject Name", "Exam Date");
    for entry in &record.subjects {
        let (code, name, date) = match entry {
            SubjectEntry::Detailed(subject) => {
                (subject.code.as_str(), subject.name.as_str(), subject.date.as_str())
            }
            SubjectEntry::Bare(text) => ("", text.as_str(), ""),
        };
        let _ = writeln!(out, "    {code:<12} {name:<40} {date}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hallticket::{Program, Semester, Subject, TicketId};

    fn record(subjects: Vec<SubjectEntry>) -> StudentRecord {
        StudentRecord {
            id: "id-1".to_string(),
            name: "A Kumar".to_string(),
            roll_number: "R100".to_string(),
            program: Program::Mba,
            semester: Semester::new(2).unwrap(),
            exam_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            seat_number: "S1".to_string(),
            hall_ticket_id: TicketId::from("1A2B3C4D"),
            subjects,
        }
    }

    #[test]
    fn test_format_record_with_subjects() {
        let text = format_record(&record(vec![
            SubjectEntry::Detailed(Subject::new("C1", "Intro", "01-05-2024")),
            SubjectEntry::Bare("Viva".to_string()),
        ]));
        assert!(text.starts_with("A Kumar - R100\n"));
        assert!(text.contains("Master of Business Administration (MBA)"));
        assert!(text.contains("2nd"));
        assert!(text.contains("01-05-2024"));
        assert!(text.contains("Examination Subjects:"));
        assert!(text.lines().any(|l| l.trim_start().starts_with("C1") && l.contains("Intro")));
        assert!(text.lines().any(|l| l.trim() == "Viva"));
    }

    #[test]
    fn test_format_record_without_subjects() {
        let text = format_record(&record(Vec::new()));
        assert!(!text.contains("Examination Subjects"));
        assert!(text.contains("Hall Ticket ID: 1A2B3C4D"));
    }
}
