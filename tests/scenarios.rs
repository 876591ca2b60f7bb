//! End-to-end workflows over a file-backed store.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use hallticket::{
    CsvStore, Program, RawSubjects, RecordStore, Registry, RenderOptions, Semester, Subject,
    SubjectEntry, TicketForm, TicketRenderer, code,
};
use pretty_assertions::assert_eq;

fn registry(dir: &Path) -> Registry<CsvStore> {
    let options = RenderOptions {
        institution: "GODAVARI INSTITUTE OF MANAGEMENT AND RESEARCH".to_string(),
        subtitle: "EXAMINATION HALL TICKET".to_string(),
        code_size_px: 200,
        scratch_dir: dir.join("artifacts"),
        today: Some(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()),
    };
    Registry::new(
        CsvStore::new(dir.join("db").join("student_database.csv")),
        TicketRenderer::new(options),
        dir.join("artifacts"),
    )
}

fn form(name: &str) -> TicketForm {
    TicketForm {
        name: name.to_string(),
        roll_number: "R100".to_string(),
        program: Program::Bba,
        semester: "1st".parse::<Semester>().unwrap(),
        exam_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        seat_number: "S1".to_string(),
        subjects: RawSubjects::Entries(vec![SubjectEntry::Detailed(Subject::new(
            "C1",
            "Intro",
            "2024-05-01",
        ))]),
    }
}

fn rows_for(registry: &Registry<CsvStore>, roll: &str) -> usize {
    registry
        .store()
        .load_all()
        .unwrap()
        .iter()
        .filter(|record| record.roll_number == roll)
        .count()
}

#[test]
fn generation_stores_one_row_and_renders_document() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = registry(dir.path());

    let generated = registry.generate(form("A Kumar")).unwrap();
    let ticket_id = generated.record.hall_ticket_id.to_string();

    assert!(generated.stored);
    assert_eq!(rows_for(&registry, "R100"), 1);
    assert_eq!(generated.ticket.code_payload, format!("{ticket_id}:R100"));
    assert!(generated.ticket.code_embedded);

    let bytes = fs::read(&generated.document_path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert_eq!(
        generated.document_path.file_name().unwrap().to_string_lossy(),
        format!("hall_ticket_R100_{ticket_id}.pdf")
    );

    let stored = registry.store().load_all().unwrap();
    assert_eq!(stored[0].name, "A Kumar");
    assert_eq!(stored[0].program, Program::Bba);
    assert_eq!(stored[0].subjects, generated.record.subjects);
}

#[test]
fn resubmission_replaces_previous_row() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = registry(dir.path());

    registry.generate(form("A Kumar")).unwrap();
    registry.generate(form("A K Kumar")).unwrap();

    let records = registry.store().load_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "A K Kumar");
}

#[test]
fn deletion_removes_row_and_document() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = registry(dir.path());

    let generated = registry.generate(form("A Kumar")).unwrap();
    let ticket_id = generated.record.hall_ticket_id.to_string();
    assert!(generated.document_path.exists());

    let deletion = registry.delete("R100", &ticket_id).unwrap();
    assert_eq!(deletion.removed, 1);
    assert!(deletion.document_removed);
    assert_eq!(rows_for(&registry, "R100"), 0);
    assert!(!generated.document_path.exists());
}

#[test]
fn scanned_payload_resolves_to_the_stored_record() {
    let dir = tempfile::tempdir().unwrap();
    let mut registry = registry(dir.path());

    let generated = registry.generate(form("A Kumar")).unwrap();
    let (ticket, roll) = code::decode(&generated.ticket.code_payload).unwrap();
    assert_eq!(ticket, generated.record.hall_ticket_id.as_str());
    assert_eq!(roll, "R100");

    let found = registry.lookup_code(&generated.ticket.code_payload).unwrap();
    assert_eq!(found, generated.record);

    let (reissued, path) = registry.download(&found).unwrap();
    assert_eq!(path, generated.document_path);
    assert!(reissued.pdf.starts_with(b"%PDF"));
}

#[test]
fn store_survives_reopening() {
    let dir = tempfile::tempdir().unwrap();
    let generated = registry(dir.path()).generate(form("A Kumar")).unwrap();

    let reopened = registry(dir.path());
    let browse = reopened.browse("kumar");
    assert!(browse.load_error.is_none());
    assert_eq!(browse.records, vec![generated.record]);
}

#[test]
fn hand_edited_bad_row_does_not_lock_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("db").join("student_database.csv");
    fs::create_dir_all(db.parent().unwrap()).unwrap();
    fs::write(
        &db,
        "id,name,roll_number,program,semester,exam_date,seat_number,hall_ticket_id,subjects\n\
         u-1,B Rao,R200,MCA,3rd,2024-06-10,S2,5E6F7A8B,Economics\n\
         u-2,C Das,R300,PhD,1st,,S3,0BADF00D,\n",
    )
    .unwrap();
    let mut registry = registry(dir.path());

    let browse = registry.browse("");
    assert!(browse.load_error.is_none());
    assert_eq!(browse.records.len(), 1);
    assert_eq!(browse.records[0].roll_number, "R200");

    let generated = registry.generate(form("A Kumar")).unwrap();
    assert!(generated.stored);
    assert_eq!(registry.browse("").records.len(), 2);

    let deletion = registry.delete("R300", "0BADF00D").unwrap();
    assert_eq!(deletion.removed, 1);
    assert!(!fs::read_to_string(&db).unwrap().contains("PhD"));
    assert_eq!(registry.browse("").records.len(), 2);
}
