//! Examination subject lists and their text encodings.
//!
//! Stores written by older tooling hold subjects in several shapes: a JSON
//! list, a Python-literal list with single-quoted strings, or a bare
//! comma-separated string typed by hand. Everything is normalized into
//! [`SubjectEntry`] values; new writes always use the versioned envelope.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

const ENVELOPE_VERSION: u32 = 1;

/// Longest subject name printed without truncation.
pub const MAX_SUBJECT_NAME_CHARS: usize = 40;
const TRUNCATED_PREFIX_CHARS: usize = 37;
const ELLIPSIS: &str = "...";

/// A subject with its paper code and sitting date.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subject {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub date: String,
}

impl Subject {
    pub fn new(code: impl Into<String>, name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            date: date.into(),
        }
    }
}

/// One line of a subject list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum SubjectEntry {
    Detailed(Subject),
    /// Free text with no code or date, usually from a hand-edited store.
    Bare(String),
}

impl SubjectEntry {
    /// Text for the name column.
    pub fn name(&self) -> &str {
        match self {
            SubjectEntry::Detailed(subject) => &subject.name,
            SubjectEntry::Bare(text) => text,
        }
    }
}

impl From<Subject> for SubjectEntry {
    fn from(value: Subject) -> Self {
        SubjectEntry::Detailed(value)
    }
}

/// Subjects as they arrive from a caller: already structured, or as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawSubjects {
    Entries(Vec<SubjectEntry>),
    Text(String),
}

impl RawSubjects {
    /// Collapse every accepted shape into a list of entries.
    pub fn normalize(self) -> Vec<SubjectEntry> {
        match self {
            RawSubjects::Entries(entries) => entries,
            RawSubjects::Text(text) => parse_subjects(&text),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    subjects: Vec<SubjectEntry>,
}

/// Serialize subjects into the stored text form.
pub fn encode_subjects(subjects: &[SubjectEntry]) -> Result<String> {
    let envelope = Envelope {
        version: ENVELOPE_VERSION,
        subjects: subjects.to_vec(),
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Parse any accepted text form of a subject list. Never fails: text that is
/// not a recognizable list is split on commas.
pub fn parse_subjects(text: &str) -> Vec<SubjectEntry> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    if trimmed.starts_with('{') {
        match serde_json::from_str::<Envelope>(trimmed) {
            Ok(envelope) => {
                if envelope.version != ENVELOPE_VERSION {
                    warn!(
                        "subject list has version {}, reading as version {}",
                        envelope.version, ENVELOPE_VERSION
                    );
                }
                return envelope.subjects;
            }
            Err(err) => warn!("subject envelope unreadable ({err}); falling back to plain text"),
        }
    } else if trimmed.starts_with('[') {
        if let Ok(entries) = serde_json::from_str::<Vec<SubjectEntry>>(trimmed) {
            return entries;
        }
        match python_literal_to_json(trimmed)
            .and_then(|json| serde_json::from_str::<Vec<SubjectEntry>>(&json).ok())
        {
            Some(entries) => return entries,
            None => warn!("subject list '{trimmed}' unreadable; falling back to plain text"),
        }
    }

    split_comma_list(trimmed)
}

fn split_comma_list(text: &str) -> Vec<SubjectEntry> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| SubjectEntry::Bare(part.to_string()))
        .collect()
}

/// Rewrite a Python list/dict literal of strings into JSON.
///
/// Only the subset written for subject lists is handled: brackets, braces,
/// commas, colons and quoted strings. Returns `None` on anything else.
fn python_literal_to_json(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '[' | ']' | '{' | '}' | ',' | ':' => out.push(ch),
            c if c.is_whitespace() => out.push(c),
            '\'' | '"' => {
                let quote = ch;
                let mut value = String::new();
                loop {
                    match chars.next()? {
                        '\\' => value.push(unescape(&mut chars)?),
                        c if c == quote => break,
                        c => value.push(c),
                    }
                }
                out.push_str(&serde_json::to_string(&value).ok()?);
            }
            _ => return None,
        }
    }
    Some(out)
}

/// Decode the escape following a backslash inside a quoted literal.
fn unescape<I: Iterator<Item = char>>(chars: &mut I) -> Option<char> {
    match chars.next()? {
        c @ ('\\' | '\'' | '"') => Some(c),
        'n' => Some('\n'),
        't' => Some('\t'),
        'r' => Some('\r'),
        'x' => hex_char(chars, 2),
        'u' => hex_char(chars, 4),
        'U' => hex_char(chars, 8),
        _ => None,
    }
}

fn hex_char<I: Iterator<Item = char>>(chars: &mut I, digits: usize) -> Option<char> {
    let code: String = chars.by_ref().take(digits).collect();
    if code.chars().count() != digits {
        return None;
    }
    u32::from_str_radix(&code, 16).ok().and_then(char::from_u32)
}

/// Shorten a subject name to fit the name column.
pub fn truncate_subject_name(name: &str) -> Cow<'_, str> {
    if name.chars().count() <= MAX_SUBJECT_NAME_CHARS {
        return Cow::Borrowed(name);
    }
    let mut short: String = name.chars().take(TRUNCATED_PREFIX_CHARS).collect();
    short.push_str(ELLIPSIS);
    Cow::Owned(short)
}
