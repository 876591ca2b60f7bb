//! Convenience helpers shared across command handlers.

use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use hallticket::{Subject, parse_exam_date};

const SUBJECT_DATE_FORMAT: &str = "%d-%m-%Y";

/// Read a file argument, treating `-` as stdin.
pub fn read_text_arg(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        return read_stdin();
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Read the entire stdin stream into memory.
pub fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("failed to read from stdin")?;
    Ok(buffer)
}

/// Persist bytes either to a file or stdout when `-` is provided.
pub fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    if path.as_os_str() == "-" {
        io::stdout().write_all(content)?;
        return Ok(());
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

/// Clap-friendly date parser accepting `YYYY-MM-DD` or `DD-MM-YYYY`.
pub fn parse_date_arg(input: &str) -> Result<NaiveDate, String> {
    parse_exam_date(input).map_err(|err| err.to_string())
}

/// Clap-friendly subject parser for `CODE|NAME|DATE`.
///
/// The date may be left empty; when given it is normalized to `DD-MM-YYYY`.
pub fn parse_subject_arg(input: &str) -> Result<Subject, String> {
    let parts: Vec<&str> = input.split('|').map(str::trim).collect();
    let [code, name, date] = parts.as_slice() else {
        return Err("subject must be CODE|NAME|DATE".to_string());
    };
    if name.is_empty() {
        return Err("subject name cannot be empty".to_string());
    }
    let date = if date.is_empty() {
        String::new()
    } else {
        parse_exam_date(date)
            .map_err(|err| err.to_string())?
            .format(SUBJECT_DATE_FORMAT)
            .to_string()
    };
    Ok(Subject::new(*code, *name, date))
}

/// Ask a yes/no question on stderr and read the answer from stdin.
pub fn confirm(prompt: &str) -> Result<bool> {
    let mut stderr = io::stderr();
    write!(stderr, "{prompt} [y/N] ")?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
