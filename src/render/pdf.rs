//! Serialize a [`Composition`] into a single-page PDF.

use image::GrayImage;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use tracing::debug;

use crate::error::{Error, Result};
use crate::render::layout::{Composition, Mark};
use crate::render::metrics::Font;

const PDF_VERSION: &str = "1.5";
const CODE_RESOURCE: &str = "Im1";
const PRODUCER: &str = "hallticket";

fn real(value: f32) -> Object {
    Object::Real(value.into())
}

fn name(value: &str) -> Object {
    Object::Name(value.as_bytes().to_vec())
}

/// Map text onto WinAnsi bytes. Characters outside Latin-1 print as `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|ch| match u32::from(ch) {
            code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
            _ => b'?',
        })
        .collect()
}

fn operations(composition: &Composition, with_code: bool) -> Vec<Operation> {
    let mut ops = Vec::new();
    for mark in &composition.marks {
        match mark {
            Mark::Text {
                font,
                size,
                x,
                y,
                text,
            } => {
                ops.push(Operation::new("BT", vec![]));
                ops.push(Operation::new(
                    "Tf",
                    vec![name(font.resource_name()), real(*size)],
                ));
                ops.push(Operation::new("Td", vec![real(*x), real(*y)]));
                ops.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(win_ansi(text))],
                ));
                ops.push(Operation::new("ET", vec![]));
            }
            Mark::Frame {
                x,
                y,
                width,
                height,
                line_width,
            } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new("w", vec![real(*line_width)]));
                ops.push(Operation::new(
                    "re",
                    vec![real(*x), real(*y), real(*width), real(*height)],
                ));
                ops.push(Operation::new("S", vec![]));
                ops.push(Operation::new("Q", vec![]));
            }
            Mark::Band {
                x,
                y,
                width,
                height,
                gray,
            } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new("g", vec![real(*gray)]));
                ops.push(Operation::new(
                    "re",
                    vec![real(*x), real(*y), real(*width), real(*height)],
                ));
                ops.push(Operation::new("f", vec![]));
                ops.push(Operation::new("Q", vec![]));
            }
            Mark::Rule { x1, y1, x2, y2 } => {
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new("w", vec![real(1.0)]));
                ops.push(Operation::new("m", vec![real(*x1), real(*y1)]));
                ops.push(Operation::new("l", vec![real(*x2), real(*y2)]));
                ops.push(Operation::new("S", vec![]));
                ops.push(Operation::new("Q", vec![]));
            }
            Mark::Code {
                x,
                y,
                width,
                height,
            } => {
                if !with_code {
                    continue;
                }
                ops.push(Operation::new("q", vec![]));
                ops.push(Operation::new(
                    "cm",
                    vec![
                        real(*width),
                        real(0.0),
                        real(0.0),
                        real(*height),
                        real(*x),
                        real(*y),
                    ],
                ));
                ops.push(Operation::new("Do", vec![name(CODE_RESOURCE)]));
                ops.push(Operation::new("Q", vec![]));
            }
        }
    }
    ops
}

fn font_dictionary(font: Font) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => font.base_font(),
        "Encoding" => "WinAnsiEncoding",
    }
}

fn image_stream(code: &GrayImage) -> Stream {
    let (width, height) = code.dimensions();
    Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(width),
            "Height" => i64::from(height),
            "ColorSpace" => "DeviceGray",
            "BitsPerComponent" => 8_i64,
        },
        code.as_raw().clone(),
    )
}

/// Write `composition` as a PDF document. The QR image is embedded only when
/// `code` is present.
pub fn write_pdf(composition: &Composition, code: Option<&GrayImage>, title: &str) -> Result<Vec<u8>> {
    let mut doc = Document::with_version(PDF_VERSION);
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font_dictionary(Font::Regular));
    let bold_id = doc.add_object(font_dictionary(Font::Bold));

    let mut resources = dictionary! {
        "Font" => dictionary! {
            Font::Regular.resource_name() => regular_id,
            Font::Bold.resource_name() => bold_id,
        },
    };
    if let Some(image) = code {
        let image_id = doc.add_object(image_stream(image));
        resources.set(
            "XObject",
            dictionary! {
                CODE_RESOURCE => image_id,
            },
        );
    }
    let resources_id = doc.add_object(resources);

    let content = Content {
        operations: operations(composition, code.is_some()),
    };
    let encoded = content.encode().map_err(Error::pdf)?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![Object::Reference(page_id)],
        "Count" => 1_i64,
        "Resources" => resources_id,
        "MediaBox" => vec![real(0.0), real(0.0), real(composition.width), real(composition.height)],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(win_ansi(title)),
        "Producer" => Object::string_literal(PRODUCER),
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(Error::pdf)?;
    debug!("assembled {} byte PDF '{}'", bytes.len(), title);
    Ok(bytes)
}
