use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::record::{StudentRecord, TicketId, parse_exam_date};
use crate::store::RecordStore;
use crate::subjects::{encode_subjects, parse_subjects};

/// Header of the backing file, in column order.
pub const COLUMNS: [&str; 9] = [
    "id",
    "name",
    "roll_number",
    "program",
    "semester",
    "exam_date",
    "seat_number",
    "hall_ticket_id",
    "subjects",
];

/// One CSV line, kept as text so a bad field can be reported with its line.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CsvRow {
    #[serde(default)]
    id: String,
    #[serde(default)]
    name: String,
    roll_number: String,
    program: String,
    semester: String,
    exam_date: String,
    #[serde(default)]
    seat_number: String,
    hall_ticket_id: String,
    #[serde(default)]
    subjects: String,
}

impl CsvRow {
    fn from_record(record: &StudentRecord) -> Result<Self> {
        Ok(Self {
            id: record.id.clone(),
            name: record.name.clone(),
            roll_number: record.roll_number.clone(),
            program: record.program.label().to_string(),
            semester: record.semester.to_string(),
            exam_date: record.exam_date_stored(),
            seat_number: record.seat_number.clone(),
            hall_ticket_id: record.hall_ticket_id.to_string(),
            subjects: encode_subjects(&record.subjects)?,
        })
    }

    fn into_record(self, line: u64) -> Result<StudentRecord> {
        let malformed = |err: Error| Error::MalformedRow {
            line,
            message: err.to_string(),
        };
        Ok(StudentRecord {
            program: self.program.parse().map_err(malformed)?,
            semester: self.semester.parse().map_err(malformed)?,
            exam_date: parse_exam_date(&self.exam_date).map_err(malformed)?,
            subjects: parse_subjects(&self.subjects),
            id: self.id,
            name: self.name,
            roll_number: self.roll_number,
            seat_number: self.seat_number,
            hall_ticket_id: TicketId::from(self.hall_ticket_id),
        })
    }
}

/// A line of the backing file. Lines that do not parse are carried through
/// rewrites untouched.
#[derive(Debug, Clone)]
enum Row {
    Parsed(StudentRecord),
    Unparsed(CsvRow),
}

impl Row {
    fn roll_number(&self) -> &str {
        match self {
            Row::Parsed(record) => &record.roll_number,
            Row::Unparsed(row) => &row.roll_number,
        }
    }

    fn is_same_ticket(&self, roll_number: &str, hall_ticket_id: &str) -> bool {
        match self {
            Row::Parsed(record) => record.is_same_ticket(roll_number, hall_ticket_id),
            Row::Unparsed(row) => {
                row.roll_number == roll_number && row.hall_ticket_id == hall_ticket_id
            }
        }
    }

    fn to_csv(&self) -> Result<CsvRow> {
        match self {
            Row::Parsed(record) => CsvRow::from_record(record),
            Row::Unparsed(row) => Ok(row.clone()),
        }
    }
}

/// Record store backed by a single CSV file.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the backing file with only the header row.
    fn initialize(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }
        self.write_all(&[])?;
        info!("created empty record store at {}", self.path.display());
        Ok(())
    }

    /// Read every line. A line whose fields do not parse is logged and kept
    /// as [`Row::Unparsed`].
    fn read_rows(&self) -> Result<Vec<Row>> {
        let read_err = |source: csv::Error| Error::StoreRead {
            path: self.path.clone(),
            source,
        };
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .map_err(read_err)?;

        let headers = reader.headers().map_err(read_err)?.clone();

        let mut rows = Vec::new();
        for raw in reader.records() {
            let raw = raw.map_err(read_err)?;
            let line = raw.position().map_or(0, |pos| pos.line());
            let row: CsvRow = raw.deserialize(Some(&headers)).map_err(read_err)?;
            match row.clone().into_record(line) {
                Ok(record) => rows.push(Row::Parsed(record)),
                Err(err) => {
                    warn!("skipping {err} in {}", self.path.display());
                    rows.push(Row::Unparsed(row));
                }
            }
        }
        debug!("read {} row(s) from {}", rows.len(), self.path.display());
        Ok(rows)
    }

    fn load_rows(&self) -> Result<Vec<Row>> {
        if !self.path.exists() {
            self.initialize()?;
            return Ok(Vec::new());
        }
        self.read_rows()
    }

    /// Truncate and rewrite the file with `rows`.
    fn write_all(&self, rows: &[Row]) -> Result<()> {
        let write_err = |source: csv::Error| Error::StoreWrite {
            path: self.path.clone(),
            source,
        };
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)
            .map_err(write_err)?;
        writer.write_record(COLUMNS).map_err(write_err)?;
        for row in rows {
            writer.serialize(row.to_csv()?).map_err(write_err)?;
        }
        writer.flush()?;
        debug!("wrote {} row(s) to {}", rows.len(), self.path.display());
        Ok(())
    }
}

impl RecordStore for CsvStore {
    /// Every row that parses. Unparsable rows are skipped with a warning but
    /// stay in the file.
    fn load_all(&self) -> Result<Vec<StudentRecord>> {
        Ok(self
            .load_rows()?
            .into_iter()
            .filter_map(|row| match row {
                Row::Parsed(record) => Some(record),
                Row::Unparsed(_) => None,
            })
            .collect())
    }

    fn upsert(&mut self, record: StudentRecord) -> Result<()> {
        let mut rows = self.load_rows()?;
        let before = rows.len();
        rows.retain(|row| row.roll_number() != record.roll_number);
        if rows.len() != before {
            debug!(
                "replacing {} row(s) for roll number {}",
                before - rows.len(),
                record.roll_number
            );
        }
        let roll_number = record.roll_number.clone();
        rows.push(Row::Parsed(record));
        self.write_all(&rows)?;
        info!("stored record for roll number {roll_number}");
        Ok(())
    }

    fn delete(&mut self, roll_number: &str, hall_ticket_id: &str) -> Result<usize> {
        let mut rows = self.load_rows()?;
        let before = rows.len();
        rows.retain(|row| !row.is_same_ticket(roll_number, hall_ticket_id));
        let removed = before - rows.len();
        self.write_all(&rows)?;
        info!("deleted {removed} record(s) for {roll_number}/{hall_ticket_id}");
        Ok(removed)
    }
}
