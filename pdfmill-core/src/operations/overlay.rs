//! Text overlays stamped onto existing pages: page numbers and watermarks.
//!
//! Both operations work the same way: a new content stream is appended to
//! each page's `/Contents` (so it paints after the page's own content) and
//! a standard-14 Helvetica entry is registered in the page's font
//! resources under a name unlikely to clash with existing resources.

use crate::error::OperationResult;
use crate::naming;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};
use std::path::Path;
use tracing::debug;

/// Resource name for the overlay font.
const OVERLAY_FONT: &str = "PmOv1";

/// Stamp `1..=N` at the bottom center of each page, Helvetica 12.
pub fn add_page_numbers(input: &Path, output_dir: &Path) -> OperationResult<String> {
    let mut doc = Document::load(input)?;
    let font_id = overlay_font(&mut doc);
    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();

    for (index, page_id) in page_ids.iter().enumerate() {
        let label = (index + 1).to_string();
        let ops = vec![
            Operation::new("q", vec![]),
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![OVERLAY_FONT.into(), 12_i64.into()]),
            Operation::new("Td", vec![306_i64.into(), 30_i64.into()]),
            Operation::new("Tj", vec![Object::string_literal(label)]),
            Operation::new("ET", vec![]),
            Operation::new("Q", vec![]),
        ];
        stamp_page(&mut doc, *page_id, font_id, ops)?;
    }

    let name = naming::artifact_name("pdf");
    doc.save(output_dir.join(&name))?;
    debug!(pages = page_ids.len(), artifact = %name, "numbered pages");
    Ok(name)
}

/// Stamp diagonal gray watermark text across every page, Helvetica 40.
pub fn add_watermark(input: &Path, text: &str, output_dir: &Path) -> OperationResult<String> {
    let mut doc = Document::load(input)?;
    let font_id = overlay_font(&mut doc);
    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();

    // 45-degree text matrix anchored mid-page; centered using a 0.5 em
    // average glyph width since standard-14 metrics are not loaded.
    const COS45: f64 = std::f64::consts::FRAC_1_SQRT_2;
    let half_width = text.chars().count() as f64 * 40.0 * 0.5 / 2.0;

    for page_id in &page_ids {
        let ops = vec![
            Operation::new("q", vec![]),
            Operation::new("g", vec![0.5_f64.into()]),
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![OVERLAY_FONT.into(), 40_i64.into()]),
            Operation::new(
                "Tm",
                vec![
                    COS45.into(),
                    COS45.into(),
                    (-COS45).into(),
                    COS45.into(),
                    300_i64.into(),
                    400_i64.into(),
                ],
            ),
            Operation::new("Td", vec![(-half_width).into(), 0_i64.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
            Operation::new("Q", vec![]),
        ];
        stamp_page(&mut doc, *page_id, font_id, ops)?;
    }

    let name = naming::artifact_name("pdf");
    doc.save(output_dir.join(&name))?;
    debug!(pages = page_ids.len(), artifact = %name, "watermarked pages");
    Ok(name)
}

fn overlay_font(doc: &mut Document) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    })
}

fn stamp_page(
    doc: &mut Document,
    page_id: ObjectId,
    font_id: ObjectId,
    ops: Vec<Operation>,
) -> OperationResult<()> {
    ensure_overlay_font(doc, page_id, font_id)?;
    append_content(doc, page_id, ops)
}

/// Register the overlay font in the page's `/Resources` `/Font` dictionary,
/// following one level of indirection for either dictionary.
fn ensure_overlay_font(
    doc: &mut Document,
    page_id: ObjectId,
    font_id: ObjectId,
) -> OperationResult<()> {
    let resources_entry = {
        let page = doc.get_object(page_id)?.as_dict()?;
        page.get(b"Resources").ok().cloned()
    };

    match resources_entry {
        Some(Object::Reference(resources_id)) => {
            let font_ref = {
                let resources = doc.get_object(resources_id)?.as_dict()?;
                match resources.get(b"Font") {
                    Ok(Object::Reference(id)) => Some(*id),
                    _ => None,
                }
            };
            if let Some(fonts_id) = font_ref {
                let fonts = doc.get_object_mut(fonts_id)?.as_dict_mut()?;
                fonts.set(OVERLAY_FONT, font_id);
            } else {
                let resources = doc.get_object_mut(resources_id)?.as_dict_mut()?;
                set_font_entry(resources, font_id);
            }
        }
        Some(Object::Dictionary(mut resources)) => {
            if let Ok(Object::Reference(fonts_id)) = resources.get(b"Font").cloned() {
                let fonts = doc.get_object_mut(fonts_id)?.as_dict_mut()?;
                fonts.set(OVERLAY_FONT, font_id);
            } else {
                set_font_entry(&mut resources, font_id);
            }
            let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
            page.set("Resources", Object::Dictionary(resources));
        }
        _ => {
            // No resources of its own; inherited entries are rare enough in
            // practice that a page-level dictionary with just our font works.
            let mut resources = Dictionary::new();
            set_font_entry(&mut resources, font_id);
            let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
            page.set("Resources", Object::Dictionary(resources));
        }
    }
    Ok(())
}

fn set_font_entry(resources: &mut Dictionary, font_id: ObjectId) {
    let mut fonts = match resources.get(b"Font") {
        Ok(Object::Dictionary(existing)) => existing.clone(),
        _ => Dictionary::new(),
    };
    fonts.set(OVERLAY_FONT, font_id);
    resources.set("Font", Object::Dictionary(fonts));
}

/// Append a content stream after the page's existing `/Contents`.
fn append_content(
    doc: &mut Document,
    page_id: ObjectId,
    ops: Vec<Operation>,
) -> OperationResult<()> {
    let encoded = Content { operations: ops }.encode()?;
    let stream_id = doc.add_object(lopdf::Stream::new(Dictionary::new(), encoded));

    let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
    let contents = match page.get(b"Contents") {
        Ok(Object::Reference(existing)) => Object::Array(vec![
            Object::Reference(*existing),
            Object::Reference(stream_id),
        ]),
        Ok(Object::Array(existing)) => {
            let mut streams = existing.clone();
            streams.push(Object::Reference(stream_id));
            Object::Array(streams)
        }
        _ => Object::Reference(stream_id),
    };
    page.set("Contents", contents);
    Ok(())
}
