//! Page rotation.
//!
//! Adds the requested angle to each page's `/Rotate` entry, normalized to
//! 0..360. Content streams are untouched; viewers apply the rotation.

use crate::error::{OperationError, OperationResult};
use crate::naming;
use lopdf::{Document, Object, ObjectId};
use std::path::Path;
use tracing::debug;

/// Rotate every page of `input` by `angle` degrees (any multiple of 90,
/// negative values allowed).
pub fn rotate_pdf(input: &Path, angle: i64, output_dir: &Path) -> OperationResult<String> {
    if angle % 90 != 0 {
        return Err(OperationError::InvalidRotation(angle));
    }

    let mut doc = Document::load(input)?;
    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
    for page_id in page_ids {
        let page = doc.get_object_mut(page_id)?.as_dict_mut()?;
        let current = page
            .get(b"Rotate")
            .and_then(Object::as_i64)
            .unwrap_or(0);
        page.set("Rotate", (current + angle).rem_euclid(360));
    }

    let name = naming::artifact_name("pdf");
    doc.save(output_dir.join(&name))?;
    debug!(angle, artifact = %name, "rotated document");
    Ok(name)
}
