//! QR payloads printed on hall tickets.
//!
//! The payload is `<hall_ticket_id>:<roll_number>` in plain text. Neither
//! value is escaped, so a roll number containing a colon cannot round-trip.

use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use qrcode::{Color, EcLevel, QrCode};
use tracing::warn;

use crate::error::{Error, Result};

const SEPARATOR: char = ':';
/// Modules of white border around the symbol.
const QUIET_ZONE: usize = 4;
const DARK: Luma<u8> = Luma([0]);
const LIGHT: Luma<u8> = Luma([255]);

/// Build the payload for a ticket.
pub fn encode(hall_ticket_id: &str, roll_number: &str) -> String {
    format!("{hall_ticket_id}{SEPARATOR}{roll_number}")
}

/// Split a scanned payload into `(hall_ticket_id, roll_number)` at the first
/// colon. Trailing line terminators left by scanners are ignored.
pub fn decode(payload: &str) -> Result<(String, String)> {
    let cleaned = payload.trim_end_matches(['\r', '\n']);
    cleaned
        .split_once(SEPARATOR)
        .map(|(ticket, roll)| (ticket.to_string(), roll.to_string()))
        .ok_or_else(|| Error::InvalidCodePayload {
            payload: payload.to_string(),
        })
}

/// Rasterize `payload` as a `size`×`size` QR image, falling back to a blank
/// white square when the payload cannot be encoded.
pub fn rasterize(payload: &str, size: u32) -> GrayImage {
    try_rasterize(payload, size).unwrap_or_else(|err| {
        warn!("QR code unavailable, using blank placeholder: {err}");
        blank(size)
    })
}

/// Rasterize `payload` at error-correction level H with a 4-module quiet zone.
pub fn try_rasterize(payload: &str, size: u32) -> Result<GrayImage> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H)
        .map_err(|err| Error::CodeEncode(err.to_string()))?;
    let width = code.width();
    let modules = code.to_colors();

    let span = width + 2 * QUIET_ZONE;
    let module_px = size as f32 / span as f32;
    if module_px < 1.0 {
        return Err(Error::CodeEncode(format!(
            "{size}px is too small for a {width}-module symbol"
        )));
    }

    let mut img = blank(size);
    for (idx, color) in modules.iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let col = idx % width + QUIET_ZONE;
        let row = idx / width + QUIET_ZONE;
        // Edges are rounded separately so neighbouring modules never leave gaps.
        let x0 = (col as f32 * module_px).round() as i32;
        let y0 = (row as f32 * module_px).round() as i32;
        let x1 = ((col + 1) as f32 * module_px).round() as i32;
        let y1 = ((row + 1) as f32 * module_px).round() as i32;
        let w = (x1 - x0).max(1) as u32;
        let h = (y1 - y0).max(1) as u32;
        draw_filled_rect_mut(&mut img, Rect::at(x0, y0).of_size(w, h), DARK);
    }
    Ok(img)
}

fn blank(size: u32) -> GrayImage {
    GrayImage::from_pixel(size, size, LIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn encode_joins_with_colon() {
        assert_eq!(encode("1A2B3C4D", "R100"), "1A2B3C4D:R100");
    }

    #[test]
    fn decode_inverts_encode() {
        for (ticket, roll) in [("1A2B3C4D", "R100"), ("", "R1"), ("ABCDEFGH", ""), ("T", "roll with spaces")] {
            let payload = encode(ticket, roll);
            assert_eq!(
                decode(&payload).unwrap(),
                (ticket.to_string(), roll.to_string())
            );
        }
    }

    #[test]
    fn decode_splits_on_first_colon_only() {
        let (ticket, roll) = decode("AB12CD34:R:100").unwrap();
        assert_eq!(ticket, "AB12CD34");
        assert_eq!(roll, "R:100");
    }

    #[test]
    fn decode_strips_scanner_newline() {
        let (ticket, roll) = decode("AB12CD34:R100\r\n").unwrap();
        assert_eq!(ticket, "AB12CD34");
        assert_eq!(roll, "R100");
    }

    #[test]
    fn decode_rejects_payload_without_colon() {
        let err = decode("AB12CD34R100").unwrap_err();
        assert!(matches!(err, Error::InvalidCodePayload { .. }));
    }

    #[test]
    fn rasterize_has_requested_size_and_dark_modules() {
        let img = rasterize(&encode("1A2B3C4D", "R100"), 200);
        assert_eq!(img.dimensions(), (200, 200));
        assert!(img.pixels().any(|p| p.0[0] == 0));
        // Quiet zone corner stays white.
        assert_eq!(img.get_pixel(0, 0).0[0], 255);
        assert_eq!(img.get_pixel(199, 199).0[0], 255);
    }

    #[test]
    fn rasterize_finder_pattern_sits_inside_quiet_zone() {
        let img = try_rasterize("X:1", 290).unwrap();
        // Version 1 at level H is 21 modules; 29 with quiet zone, 10px each.
        let first_dark = (0..290).find(|&x| img.get_pixel(x, 45).0[0] == 0);
        assert_eq!(first_dark, Some(40));
    }

    #[test]
    fn oversized_payload_falls_back_to_blank() {
        let payload = "x".repeat(4000);
        assert!(try_rasterize(&payload, 200).is_err());

        let img = rasterize(&payload, 200);
        assert_eq!(img.dimensions(), (200, 200));
        assert!(img.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn too_small_target_is_an_error() {
        let err = try_rasterize("1A2B3C4D:R100", 10).unwrap_err();
        assert!(matches!(err, Error::CodeEncode(_)));
    }
}
