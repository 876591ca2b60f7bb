//! Page composition for the hall ticket.
//!
//! [`compose`] turns a record into a flat display list in PDF user space
//! (points, origin bottom-left). The PDF writer only serializes marks, so the
//! layout can be inspected in tests without parsing a document.

use tracing::warn;

use crate::record::StudentRecord;
use crate::render::metrics::{Font, text_width};
use crate::subjects::{SubjectEntry, truncate_subject_name};

/// One centimetre in points.
pub const CM: f32 = 28.3465;
pub const A4_WIDTH: f32 = 595.2756;
pub const A4_HEIGHT: f32 = 841.8898;

/// Lowest baseline a subject row may occupy before the table stops.
const TABLE_FLOOR: f32 = 6.0 * CM;
/// ReportLab's `lightgrey`.
const BAND_GRAY: f32 = 0.827;
const ROW_STEP: f32 = 0.7 * CM;
const CODE_SIZE: f32 = 3.0 * CM;

const INSTRUCTIONS: [&str; 5] = [
    "1. This hall ticket must be presented at the examination center.",
    "2. Candidates should be seated in the examination hall 15 minutes before the start of the examination.",
    "3. Mobile phones and electronic devices are strictly prohibited in the examination hall.",
    "4. Candidates are not allowed to leave the examination hall before the end of the examination.",
    "5. Unfair means during the examination will lead to disqualification.",
];

/// A single drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    /// Black text with its baseline starting at `(x, y)`.
    Text {
        font: Font,
        size: f32,
        x: f32,
        y: f32,
        text: String,
    },
    /// Stroked rectangle outline.
    Frame {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        line_width: f32,
    },
    /// Filled rectangle in a gray level (0 black, 1 white).
    Band {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        gray: f32,
    },
    /// Straight 1pt stroke.
    Rule { x1: f32, y1: f32, x2: f32, y2: f32 },
    /// The QR image, scaled into the given box.
    Code {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
}

/// Fixed strings printed in the page header.
#[derive(Debug, Clone)]
pub struct Heading<'a> {
    pub institution: &'a str,
    pub subtitle: &'a str,
    pub session: &'a str,
}

/// Result of laying out one ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    pub width: f32,
    pub height: f32,
    pub marks: Vec<Mark>,
    pub subjects_rendered: usize,
    pub subjects_omitted: usize,
}

impl Composition {
    /// All text runs in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.marks.iter().filter_map(|mark| match mark {
            Mark::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn has_code(&self) -> bool {
        self.marks.iter().any(|mark| matches!(mark, Mark::Code { .. }))
    }
}

/// Display-list builder that tracks the current page size.
struct Canvas {
    width: f32,
    height: f32,
    marks: Vec<Mark>,
}

impl Canvas {
    fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            marks: Vec::new(),
        }
    }

    fn text(&mut self, font: Font, size: f32, x: f32, y: f32, text: impl Into<String>) {
        self.marks.push(Mark::Text {
            font,
            size,
            x,
            y,
            text: text.into(),
        });
    }

    fn centred(&mut self, font: Font, size: f32, cx: f32, y: f32, text: &str) {
        let x = cx - text_width(text, font, size) / 2.0;
        self.text(font, size, x, y, text);
    }

    fn rule(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.marks.push(Mark::Rule { x1, y1, x2, y2 });
    }
}

/// Lay out the full ticket for `record`. The QR image and its caption are
/// placed only when `with_code` is set.
pub fn compose(record: &StudentRecord, heading: &Heading<'_>, with_code: bool) -> Composition {
    let mut page = Canvas::new(A4_WIDTH, A4_HEIGHT);
    let (w, h) = (page.width, page.height);

    page.marks.push(Mark::Frame {
        x: CM,
        y: CM,
        width: w - 2.0 * CM,
        height: h - 2.0 * CM,
        line_width: 2.0,
    });

    page.centred(Font::Bold, 16.0, w / 2.0, h - 2.0 * CM, heading.institution);
    page.centred(Font::Regular, 14.0, w / 2.0, h - 2.7 * CM, heading.subtitle);
    page.centred(Font::Regular, 10.0, w / 2.0, h - 3.3 * CM, heading.session);

    if with_code {
        page.marks.push(Mark::Code {
            x: w - 4.5 * CM,
            y: h - 8.0 * CM,
            width: CODE_SIZE,
            height: CODE_SIZE,
        });
        page.centred(Font::Regular, 8.0, w - 3.0 * CM, h - 8.5 * CM, "Scan to download");
        page.centred(Font::Regular, 8.0, w - 3.0 * CM, h - 8.8 * CM, "hall ticket");
    }

    page.text(Font::Bold, 12.0, 2.0 * CM, h - 5.0 * CM, "STUDENT INFORMATION");
    let mut y = h - 5.5 * CM;
    let details = [
        ("Name:", record.name.clone()),
        ("Roll Number:", record.roll_number.clone()),
        ("Program:", record.program.label().to_string()),
        ("Semester:", record.semester.to_string()),
        ("Exam Date:", record.exam_date_display()),
        ("Seat Number:", record.seat_number.clone()),
        ("Hall Ticket ID:", record.hall_ticket_id.to_string()),
    ];
    for (label, value) in details {
        page.text(Font::Bold, 10.0, 2.0 * CM, y, label);
        page.text(Font::Regular, 10.0, 5.0 * CM, y, value);
        y -= ROW_STEP;
    }

    page.text(Font::Bold, 12.0, 2.0 * CM, y - 0.5 * CM, "EXAMINATION DETAILS");
    y -= 1.2 * CM;

    let (y, subjects_rendered) = subject_table(&mut page, &record.subjects, y);
    let subjects_omitted = record.subjects.len() - subjects_rendered;
    if subjects_omitted > 0 {
        warn!(
            "hall ticket for {} omits {} of {} subjects (page full)",
            record.roll_number,
            subjects_omitted,
            record.subjects.len()
        );
    }

    page.text(Font::Bold, 12.0, 2.0 * CM, y - 0.5 * CM, "IMPORTANT INSTRUCTIONS");
    let mut y = y - 1.5 * CM;
    for line in INSTRUCTIONS {
        page.text(Font::Regular, 9.0, 2.0 * CM, y, line);
        y -= 0.5 * CM;
    }

    page.text(Font::Regular, 10.0, 2.0 * CM, 4.0 * CM, "Student's Signature");
    page.text(Font::Regular, 10.0, w - 6.0 * CM, 4.0 * CM, "Examiner's Signature");
    page.rule(2.0 * CM, 3.5 * CM, 6.0 * CM, 3.5 * CM);
    page.rule(w - 6.0 * CM, 3.5 * CM, w - 2.0 * CM, 3.5 * CM);

    page.centred(
        Font::Regular,
        8.0,
        w / 2.0,
        2.0 * CM,
        "This hall ticket is electronically generated and does not require a stamp.",
    );
    page.centred(
        Font::Regular,
        8.0,
        w / 2.0,
        1.7 * CM,
        "Scan QR code to download this hall ticket directly",
    );

    Composition {
        width: w,
        height: h,
        marks: page.marks,
        subjects_rendered,
        subjects_omitted,
    }
}

/// Draw the subject table starting at baseline `y`. Returns the next free
/// baseline and how many entries were drawn.
fn subject_table(page: &mut Canvas, subjects: &[SubjectEntry], mut y: f32) -> (f32, usize) {
    if subjects.is_empty() {
        page.text(Font::Regular, 10.0, 2.0 * CM, y, "No examination subjects specified.");
        return (y - ROW_STEP, 0);
    }

    page.text(Font::Bold, 10.0, 2.0 * CM, y, "Subject Code");
    page.text(Font::Bold, 10.0, 6.0 * CM, y, "Subject Name");
    page.text(Font::Bold, 10.0, 13.0 * CM, y, "Date");
    y -= 0.5 * CM;
    page.rule(2.0 * CM, y - 0.1 * CM, page.width - 2.0 * CM, y - 0.1 * CM);
    y -= 0.4 * CM;

    let mut drawn = 0;
    for entry in subjects {
        page.marks.push(Mark::Band {
            x: 2.0 * CM,
            y: y - 0.3 * CM,
            width: page.width - 4.0 * CM,
            height: 0.6 * CM,
            gray: BAND_GRAY,
        });
        match entry {
            SubjectEntry::Detailed(subject) => {
                page.text(Font::Regular, 10.0, 2.0 * CM, y, subject.code.as_str());
                page.text(Font::Regular, 10.0, 6.0 * CM, y, truncate_subject_name(&subject.name));
                page.text(Font::Regular, 10.0, 13.0 * CM, y, subject.date.as_str());
            }
            SubjectEntry::Bare(text) => {
                page.text(Font::Regular, 10.0, 6.0 * CM, y, truncate_subject_name(text));
            }
        }
        drawn += 1;
        y -= ROW_STEP;
        if y < TABLE_FLOOR {
            break;
        }
    }
    (y, drawn)
}
