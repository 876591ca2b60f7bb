//! Record storage.
//!
//! [`RecordStore`] is the handle the rest of the crate talks to. The CSV
//! backend mirrors the flat file operators already keep; [`MemoryStore`]
//! backs tests and embedding.
//!
//! Every mutation rereads and rewrites the whole set. There is no locking:
//! two processes writing at once lose one of the updates.

mod csv_store;

pub use self::csv_store::{COLUMNS, CsvStore};

use tracing::debug;

use crate::error::Result;
use crate::record::StudentRecord;

/// Load-all / upsert / delete over the full set of student records.
pub trait RecordStore {
    /// Read every stored record, in file order.
    fn load_all(&self) -> Result<Vec<StudentRecord>>;

    /// Replace any record with the same roll number, then append `record`.
    fn upsert(&mut self, record: StudentRecord) -> Result<()>;

    /// Remove records matching both roll number and ticket id exactly.
    /// Returns how many were removed.
    fn delete(&mut self, roll_number: &str, hall_ticket_id: &str) -> Result<usize>;
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn load_all(&self) -> Result<Vec<StudentRecord>> {
        (**self).load_all()
    }

    fn upsert(&mut self, record: StudentRecord) -> Result<()> {
        (**self).upsert(record)
    }

    fn delete(&mut self, roll_number: &str, hall_ticket_id: &str) -> Result<usize> {
        (**self).delete(roll_number, hall_ticket_id)
    }
}

/// Store kept entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<StudentRecord>,
}

impl MemoryStore {
    pub fn with_records(records: Vec<StudentRecord>) -> Self {
        Self { records }
    }
}

impl RecordStore for MemoryStore {
    fn load_all(&self) -> Result<Vec<StudentRecord>> {
        Ok(self.records.clone())
    }

    fn upsert(&mut self, record: StudentRecord) -> Result<()> {
        self.records = apply_upsert(std::mem::take(&mut self.records), record);
        Ok(())
    }

    fn delete(&mut self, roll_number: &str, hall_ticket_id: &str) -> Result<usize> {
        let (kept, removed) =
            apply_delete(std::mem::take(&mut self.records), roll_number, hall_ticket_id);
        self.records = kept;
        Ok(removed)
    }
}

/// Drop rows sharing the new record's roll number, then append it.
fn apply_upsert(
    mut records: Vec<StudentRecord>,
    record: StudentRecord,
) -> Vec<StudentRecord> {
    let before = records.len();
    records.retain(|existing| existing.roll_number != record.roll_number);
    if records.len() != before {
        debug!(
            "replacing {} record(s) for roll number {}",
            before - records.len(),
            record.roll_number
        );
    }
    records.push(record);
    records
}

fn apply_delete(
    mut records: Vec<StudentRecord>,
    roll_number: &str,
    hall_ticket_id: &str,
) -> (Vec<StudentRecord>, usize) {
    let before = records.len();
    records.retain(|existing| !existing.is_same_ticket(roll_number, hall_ticket_id));
    let removed = before - records.len();
    (records, removed)
}

/// Filter records by a free-text term, keeping order.
pub fn search<'a>(records: &'a [StudentRecord], term: &str) -> Vec<&'a StudentRecord> {
    records.iter().filter(|record| record.matches(term)).collect()
}
