use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::subjects::SubjectEntry;

const TICKET_ID_LEN: usize = 8;
const STORED_DATE_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_DATE_FORMAT: &str = "%d-%m-%Y";

/// Degree programmes a ticket can be issued for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum Program {
    Bba,
    Mba,
    BCom,
    MCom,
    Bca,
    Mca,
}

impl Program {
    pub const ALL: [Program; 6] = [
        Program::Bba,
        Program::Mba,
        Program::BCom,
        Program::MCom,
        Program::Bca,
        Program::Mca,
    ];

    /// Short code, e.g. `BBA` or `B.Com`.
    pub fn code(self) -> &'static str {
        match self {
            Program::Bba => "BBA",
            Program::Mba => "MBA",
            Program::BCom => "B.Com",
            Program::MCom => "M.Com",
            Program::Bca => "BCA",
            Program::Mca => "MCA",
        }
    }

    /// Full label as stored and printed.
    pub fn label(self) -> &'static str {
        match self {
            Program::Bba => "Bachelor of Business Administration (BBA)",
            Program::Mba => "Master of Business Administration (MBA)",
            Program::BCom => "Bachelor of Commerce (B.Com)",
            Program::MCom => "Master of Commerce (M.Com)",
            Program::Bca => "Bachelor of Computer Applications (BCA)",
            Program::Mca => "Master of Computer Applications (MCA)",
        }
    }
}

impl FromStr for Program {
    type Err = Error;

    /// Accepts the short code or the full label, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Program::ALL
            .into_iter()
            .find(|p| p.code().eq_ignore_ascii_case(wanted) || p.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownProgram(s.to_string()))
    }
}

impl TryFrom<String> for Program {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Program> for String {
    fn from(value: Program) -> String {
        value.label().to_string()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Semester label, `1st` through `8th`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Semester(u8);

impl Semester {
    pub const FIRST: u8 = 1;
    pub const LAST: u8 = 8;

    #[rustfmt::skip]
    pub const ALL: [Semester; 8] = [
        Semester(1), Semester(2), Semester(3), Semester(4),
        Semester(5), Semester(6), Semester(7), Semester(8),
    ];

    pub fn new(number: u8) -> Result<Self> {
        if (Self::FIRST..=Self::LAST).contains(&number) {
            Ok(Self(number))
        } else {
            Err(Error::UnknownSemester(number.to_string()))
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }
}

impl FromStr for Semester {
    type Err = Error;

    /// Accepts `3rd`, `3RD` or plain `3`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().to_ascii_lowercase();
        let digits = trimmed
            .strip_suffix("st")
            .or_else(|| trimmed.strip_suffix("nd"))
            .or_else(|| trimmed.strip_suffix("rd"))
            .or_else(|| trimmed.strip_suffix("th"))
            .unwrap_or(&trimmed);
        let number: u8 = digits
            .parse()
            .map_err(|_| Error::UnknownSemester(s.to_string()))?;
        let semester = Self::new(number).map_err(|_| Error::UnknownSemester(s.to_string()))?;
        // "1th" or "2rd" would otherwise slip through.
        if digits.len() != trimmed.len() && semester.to_string() != trimmed {
            return Err(Error::UnknownSemester(s.to_string()));
        }
        Ok(semester)
    }
}

impl TryFrom<String> for Semester {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Semester> for String {
    fn from(value: Semester) -> String {
        value.to_string()
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = match self.0 {
            1 => "st",
            2 => "nd",
            3 => "rd",
            _ => "th",
        };
        write!(f, "{}{}", self.0, suffix)
    }
}

/// Identifier of one ticket generation: 8 uppercase characters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    /// Draw a fresh id from a random UUID.
    pub fn generate() -> Self {
        let simple = Uuid::new_v4().simple().to_string();
        Self(simple[..TICKET_ID_LEN].to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TicketId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TicketId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One student's exam credential as persisted in the record store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StudentRecord {
    pub id: String,
    pub name: String,
    pub roll_number: String,
    pub program: Program,
    pub semester: Semester,
    pub exam_date: NaiveDate,
    pub seat_number: String,
    pub hall_ticket_id: TicketId,
    #[serde(default)]
    pub subjects: Vec<SubjectEntry>,
}

impl StudentRecord {
    /// Does this record match a free-text search term?
    ///
    /// Case-insensitive substring over name, roll number and ticket id; any
    /// one field matching is enough. A blank term matches everything.
    pub fn matches(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            self.name.as_str(),
            self.roll_number.as_str(),
            self.hall_ticket_id.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Exam date in the printed `DD-MM-YYYY` form.
    pub fn exam_date_display(&self) -> String {
        self.exam_date.format(DISPLAY_DATE_FORMAT).to_string()
    }

    /// Exam date in the stored `YYYY-MM-DD` form.
    pub fn exam_date_stored(&self) -> String {
        self.exam_date.format(STORED_DATE_FORMAT).to_string()
    }

    /// Key shared by the record and its rendered document.
    pub fn is_same_ticket(&self, roll_number: &str, hall_ticket_id: &str) -> bool {
        self.roll_number == roll_number && self.hall_ticket_id.as_str() == hall_ticket_id
    }
}

/// Parse an exam date in `YYYY-MM-DD` or `DD-MM-YYYY` form.
pub fn parse_exam_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, STORED_DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(trimmed, DISPLAY_DATE_FORMAT))
        .map_err(|_| Error::InvalidDate(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(name: &str, roll: &str, ticket: &str) -> StudentRecord {
        StudentRecord {
            id: "id-1".to_string(),
            name: name.to_string(),
            roll_number: roll.to_string(),
            program: Program::Bba,
            semester: Semester::new(1).unwrap(),
            exam_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            seat_number: "S1".to_string(),
            hall_ticket_id: TicketId::from(ticket),
            subjects: Vec::new(),
        }
    }

    #[test]
    fn program_parses_code_and_label() {
        assert_eq!("BBA".parse::<Program>().unwrap(), Program::Bba);
        assert_eq!("b.com".parse::<Program>().unwrap(), Program::BCom);
        assert_eq!(
            "Master of Computer Applications (MCA)"
                .parse::<Program>()
                .unwrap(),
            Program::Mca
        );
        assert!(matches!(
            "PhD".parse::<Program>(),
            Err(Error::UnknownProgram(_))
        ));
    }

    #[test]
    fn program_serializes_as_label() {
        let json = serde_json::to_string(&Program::Mba).unwrap();
        assert_eq!(json, "\"Master of Business Administration (MBA)\"");
        let back: Program = serde_json::from_str("\"MBA\"").unwrap();
        assert_eq!(back, Program::Mba);
    }

    #[test]
    fn semester_round_trips_labels() {
        for n in 1..=8 {
            let semester = Semester::new(n).unwrap();
            assert_eq!(semester.to_string().parse::<Semester>().unwrap(), semester);
        }
        assert_eq!(Semester::new(3).unwrap().to_string(), "3rd");
        assert_eq!("2".parse::<Semester>().unwrap().number(), 2);
    }

    #[test]
    fn semester_rejects_out_of_range_and_bad_suffix() {
        assert!("9th".parse::<Semester>().is_err());
        assert!("0".parse::<Semester>().is_err());
        assert!("2rd".parse::<Semester>().is_err());
        assert!("first".parse::<Semester>().is_err());
    }

    #[test]
    fn ticket_id_is_eight_uppercase_chars() {
        let id = TicketId::generate();
        assert_eq!(id.as_str().len(), 8);
        assert!(
            id.as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        );
        assert_ne!(TicketId::generate(), TicketId::generate());
    }

    #[test]
    fn exam_date_accepts_both_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(parse_exam_date("2024-05-01").unwrap(), expected);
        assert_eq!(parse_exam_date("01-05-2024").unwrap(), expected);
        assert!(matches!(
            parse_exam_date("May 1st"),
            Err(Error::InvalidDate(_))
        ));
    }

    #[test]
    fn exam_date_display_uses_day_first() {
        let r = record("A Kumar", "R100", "1A2B3C4D");
        assert_eq!(r.exam_date_display(), "01-05-2024");
        assert_eq!(r.exam_date_stored(), "2024-05-01");
    }

    #[test]
    fn matches_any_of_three_fields_case_insensitively() {
        let r = record("A Kumar", "R100", "1A2B3C4D");
        assert!(r.matches("kumar"));
        assert!(r.matches("r10"));
        assert!(r.matches("2b3c"));
        assert!(r.matches("  "));
        assert!(!r.matches("BBA"));
        assert!(!r.matches("S1"));
    }
}
