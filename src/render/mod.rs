//! Hall ticket rendering.
//!
//! A render stages the QR code as a PNG in the scratch directory, reloads it
//! for embedding and removes it again. Any trouble with the code image only
//! drops the image from the page; the ticket itself still renders.

mod layout;
mod metrics;
mod pdf;

pub use self::layout::{A4_HEIGHT, A4_WIDTH, CM, Composition, Heading, Mark, compose};
pub use self::metrics::{Font, text_width};
pub use self::pdf::write_pdf;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local, NaiveDate};
use image::GrayImage;
use tracing::{debug, info, warn};

use crate::code;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::record::StudentRecord;

/// Inputs that stay fixed across renders.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub institution: String,
    pub subtitle: String,
    /// Edge of the rasterized QR image in pixels.
    pub code_size_px: u32,
    /// Where the transient QR PNG is written.
    pub scratch_dir: PathBuf,
    /// Date used for the session label; `None` reads the local clock.
    pub today: Option<NaiveDate>,
}

impl RenderOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            institution: config.ticket.institution.clone(),
            subtitle: config.ticket.subtitle.clone(),
            code_size_px: config.ticket.code_size_px,
            scratch_dir: config.artifact_dir(),
            today: None,
        }
    }
}

/// A rendered ticket held in memory.
#[derive(Debug, Clone)]
pub struct HallTicket {
    /// `hall_ticket_<roll>_<ticket>.pdf`
    pub file_name: String,
    pub pdf: Vec<u8>,
    pub code_payload: String,
    /// False when the QR image had to be left off the page.
    pub code_embedded: bool,
    pub subjects_rendered: usize,
    pub subjects_omitted: usize,
}

/// Renders [`StudentRecord`]s into single-page PDF tickets.
#[derive(Debug, Clone)]
pub struct TicketRenderer {
    options: RenderOptions,
}

impl TicketRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Pin the session date instead of reading the clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.options.today = Some(today);
        self
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render one ticket.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pdf`] if the document cannot be assembled. Problems
    /// with the QR image are logged and reported through
    /// [`HallTicket::code_embedded`] instead.
    pub fn render(&self, record: &StudentRecord) -> Result<HallTicket> {
        let payload = code::encode(record.hall_ticket_id.as_str(), &record.roll_number);
        let code_image = match self.stage_code(&payload, &record.roll_number) {
            Ok(image) => Some(image),
            Err(err) => {
                warn!(
                    "could not add QR code to hall ticket for {}: {err}",
                    record.roll_number
                );
                None
            }
        };

        let today = self
            .options
            .today
            .unwrap_or_else(|| Local::now().date_naive());
        let session = session_label(today);
        let heading = Heading {
            institution: &self.options.institution,
            subtitle: &self.options.subtitle,
            session: &session,
        };
        let composition = compose(record, &heading, code_image.is_some());

        let title = format!("Hall Ticket {}", record.roll_number);
        let pdf = write_pdf(&composition, code_image.as_ref(), &title)?;
        info!(
            "rendered hall ticket {} for {} ({} bytes)",
            record.hall_ticket_id,
            record.roll_number,
            pdf.len()
        );

        Ok(HallTicket {
            file_name: document_file_name(&record.roll_number, record.hall_ticket_id.as_str()),
            pdf,
            code_payload: payload,
            code_embedded: code_image.is_some(),
            subjects_rendered: composition.subjects_rendered,
            subjects_omitted: composition.subjects_omitted,
        })
    }

    /// Rasterize the payload, round-trip it through a scratch PNG and return
    /// the reloaded image.
    fn stage_code(&self, payload: &str, roll_number: &str) -> Result<GrayImage> {
        let raster = code::try_rasterize(payload, self.options.code_size_px)?;

        let dir = &self.options.scratch_dir;
        fs::create_dir_all(dir).map_err(|source| Error::DirectoryCreate {
            path: dir.clone(),
            source,
        })?;
        let path = dir.join(format!("qr_{}.png", file_component(roll_number)));
        raster.save(&path)?;

        let reloaded = image::open(&path);
        remove_scratch(&path);
        Ok(reloaded?.to_luma8())
    }
}

fn remove_scratch(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        debug!("leaving scratch file {}: {err}", path.display());
    }
}

/// `"Academic Session: 2024-2025"` for any date in 2024.
pub fn session_label(today: NaiveDate) -> String {
    let year = today.year();
    format!("Academic Session: {}-{}", year, year + 1)
}

/// File name of the rendered document for a (roll number, ticket id) pair.
pub fn document_file_name(roll_number: &str, hall_ticket_id: &str) -> String {
    format!(
        "hall_ticket_{}_{}.pdf",
        file_component(roll_number),
        file_component(hall_ticket_id)
    )
}

/// Keep artifact names inside their directory.
fn file_component(value: &str) -> String {
    value
        .chars()
        .map(|ch| match ch {
            '/' | '\\' | '\0' => '_',
            other => other,
        })
        .collect()
}
