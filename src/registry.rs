//! The operations the shell drives: generate, browse, lookup, download and
//! delete.
//!
//! [`Registry`] owns a [`RecordStore`], a [`TicketRenderer`] and the artifact
//! directory where rendered documents live. Documents are named after the
//! (roll number, ticket id) pair, so deleting a record can find its file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::code;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::record::{Program, Semester, StudentRecord, TicketId};
use crate::render::{HallTicket, RenderOptions, TicketRenderer, document_file_name};
use crate::store::{CsvStore, RecordStore, search};
use crate::subjects::RawSubjects;

/// Subjects allowed on one ticket.
pub const MAX_SUBJECTS: usize = 10;

/// Everything the operator enters to generate a ticket.
#[derive(Debug, Clone)]
pub struct TicketForm {
    pub name: String,
    pub roll_number: String,
    pub program: Program,
    pub semester: Semester,
    pub exam_date: NaiveDate,
    pub seat_number: String,
    pub subjects: RawSubjects,
}

/// Outcome of [`Registry::generate`].
#[derive(Debug)]
pub struct Generated {
    pub record: StudentRecord,
    pub ticket: HallTicket,
    pub document_path: PathBuf,
    /// False when the store rejected the write; the document is still produced.
    pub stored: bool,
}

/// Outcome of [`Registry::browse`].
#[derive(Debug)]
pub struct Browse {
    pub records: Vec<StudentRecord>,
    /// Set when the store could not be read and `records` is empty because of it.
    pub load_error: Option<Error>,
}

/// Outcome of [`Registry::delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deletion {
    /// Rows removed from the store.
    pub removed: usize,
    /// Whether a rendered document was found and removed.
    pub document_removed: bool,
}

pub struct Registry<S> {
    store: S,
    renderer: TicketRenderer,
    artifact_dir: PathBuf,
}

impl Registry<CsvStore> {
    /// Registry over the CSV store and artifact directory named in `config`.
    pub fn open(config: &Config) -> Self {
        Registry::new(
            CsvStore::new(config.database_path()),
            TicketRenderer::new(RenderOptions::from_config(config)),
            config.artifact_dir(),
        )
    }
}

impl<S: RecordStore> Registry<S> {
    pub fn new(store: S, renderer: TicketRenderer, artifact_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            renderer,
            artifact_dir: artifact_dir.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn artifact_dir(&self) -> &Path {
        &self.artifact_dir
    }

    /// Where the document for a (roll number, ticket id) pair is written.
    pub fn document_path(&self, roll_number: &str, hall_ticket_id: &str) -> PathBuf {
        self.artifact_dir
            .join(document_file_name(roll_number, hall_ticket_id))
    }

    /// Validate the form, store a fresh record and render its ticket.
    ///
    /// A store failure is logged and reported through [`Generated::stored`];
    /// the ticket is rendered regardless.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] for blank fields or a subject count
    /// outside 1..=10, and rendering or I/O errors from producing the document.
    pub fn generate(&mut self, form: TicketForm) -> Result<Generated> {
        let record = build_record(form)?;

        let stored = match self.store.upsert(record.clone()) {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    "could not save {} to the record store, generating the ticket anyway: {err}",
                    record.roll_number
                );
                false
            }
        };

        let ticket = self.renderer.render(&record)?;
        let document_path = self.write_document(&ticket)?;
        info!(
            "generated hall ticket {} for {} at {}",
            record.hall_ticket_id,
            record.roll_number,
            document_path.display()
        );

        Ok(Generated {
            record,
            ticket,
            document_path,
            stored,
        })
    }

    /// All records matching `term`. An unreadable store yields an empty list
    /// together with the error.
    pub fn browse(&self, term: &str) -> Browse {
        match self.store.load_all() {
            Ok(records) => {
                let records = search(&records, term).into_iter().cloned().collect();
                Browse {
                    records,
                    load_error: None,
                }
            }
            Err(err) => {
                warn!("could not load records: {err}");
                Browse {
                    records: Vec::new(),
                    load_error: Some(err),
                }
            }
        }
    }

    /// Find the record for an exact (ticket id, roll number) pair.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if either value is blank,
    /// [`Error::NotFound`] if nothing matches, or the store's load error.
    pub fn lookup(&self, hall_ticket_id: &str, roll_number: &str) -> Result<StudentRecord> {
        let ticket = hall_ticket_id.trim();
        let roll = roll_number.trim();
        if ticket.is_empty() {
            return Err(Error::invalid_input("hall ticket id", "must not be blank"));
        }
        if roll.is_empty() {
            return Err(Error::invalid_input("roll number", "must not be blank"));
        }

        self.store
            .load_all()?
            .into_iter()
            .find(|record| record.is_same_ticket(roll, ticket))
            .ok_or_else(|| Error::NotFound {
                roll_number: roll.to_string(),
                hall_ticket_id: ticket.to_string(),
            })
    }

    /// Decode a scanned payload and look the pair up.
    pub fn lookup_code(&self, payload: &str) -> Result<StudentRecord> {
        let (ticket, roll) = code::decode(payload)?;
        debug!("code payload resolved to ticket {ticket}, roll {roll}");
        self.lookup(&ticket, &roll)
    }

    /// Render `record` again and write it to the artifact directory.
    pub fn download(&self, record: &StudentRecord) -> Result<(HallTicket, PathBuf)> {
        let ticket = self.renderer.render(record)?;
        let path = self.write_document(&ticket)?;
        Ok((ticket, path))
    }

    /// Delete the record for (roll number, ticket id) and its document.
    ///
    /// A missing document is not an error; failing to remove an existing one
    /// is logged.
    pub fn delete(&mut self, roll_number: &str, hall_ticket_id: &str) -> Result<Deletion> {
        let removed = self.store.delete(roll_number, hall_ticket_id)?;

        let path = self.document_path(roll_number, hall_ticket_id);
        let document_removed = match fs::remove_file(&path) {
            Ok(()) => true,
            Err(err) if err.kind() == io::ErrorKind::NotFound => false,
            Err(err) => {
                warn!("could not remove {}: {err}", path.display());
                false
            }
        };

        info!(
            "deleted {removed} record(s) for {roll_number}/{hall_ticket_id} (document removed: {document_removed})"
        );
        Ok(Deletion {
            removed,
            document_removed,
        })
    }

    /// Number of stored records.
    pub fn count(&self) -> Result<usize> {
        Ok(self.store.load_all()?.len())
    }

    fn write_document(&self, ticket: &HallTicket) -> Result<PathBuf> {
        fs::create_dir_all(&self.artifact_dir).map_err(|source| Error::DirectoryCreate {
            path: self.artifact_dir.clone(),
            source,
        })?;
        let path = self.artifact_dir.join(&ticket.file_name);
        fs::write(&path, &ticket.pdf)?;
        Ok(path)
    }
}

fn required(field: &'static str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_input(field, "must not be blank"));
    }
    Ok(trimmed.to_string())
}

fn build_record(form: TicketForm) -> Result<StudentRecord> {
    let name = required("name", form.name)?;
    let roll_number = required("roll number", form.roll_number)?;
    let seat_number = required("seat number", form.seat_number)?;

    let subjects = form.subjects.normalize();
    if subjects.is_empty() || subjects.len() > MAX_SUBJECTS {
        return Err(Error::invalid_input(
            "subjects",
            format!("expected 1 to {MAX_SUBJECTS}, got {}", subjects.len()),
        ));
    }

    Ok(StudentRecord {
        id: Uuid::new_v4().to_string(),
        name,
        roll_number,
        program: form.program,
        semester: form.semester,
        exam_date: form.exam_date,
        seat_number,
        hall_ticket_id: TicketId::generate(),
        subjects,
    })
}
