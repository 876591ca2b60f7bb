//! Core library for issuing and managing examination hall tickets.
//!
//! Student records live in a flat CSV store; each record renders to a
//! single-page A4 PDF carrying a QR code that resolves back to the record.

pub mod code;
pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod registry;
pub mod render;
pub mod store;
pub mod subjects;

pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use logging::{Verbosity, init_logging};
pub use record::{Program, Semester, StudentRecord, TicketId, parse_exam_date};
pub use registry::{Browse, Deletion, Generated, MAX_SUBJECTS, Registry, TicketForm};
pub use render::{HallTicket, RenderOptions, TicketRenderer, session_label};
pub use store::{CsvStore, MemoryStore, RecordStore, search};
pub use subjects::{RawSubjects, Subject, SubjectEntry, encode_subjects, parse_subjects};
