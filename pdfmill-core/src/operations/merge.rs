//! PDF merging.
//!
//! Concatenates the pages of every input document, in input order, into a
//! single new document. Object identifiers are renumbered per input so the
//! combined object table never collides; a fresh page tree and catalog are
//! built over the collected pages.

use crate::error::{OperationError, OperationResult};
use crate::naming;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Merge `inputs` into one PDF written to `output_dir`.
///
/// Returns the generated artifact name. The caller guarantees at least two
/// inputs; fewer is rejected before dispatch.
pub fn merge_pdfs(inputs: &[PathBuf], output_dir: &Path) -> OperationResult<String> {
    let mut max_id = 1;
    let mut kid_ids: Vec<ObjectId> = Vec::new();
    let mut page_objects: BTreeMap<ObjectId, Object> = BTreeMap::new();
    let mut all_objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for path in inputs {
        let mut doc = Document::load(path)?;
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        // get_pages iterates in page order; collecting kid ids here keeps
        // the final document in input order.
        for (_, page_id) in doc.get_pages() {
            let page = doc.get_object(page_id)?.to_owned();
            kid_ids.push(page_id);
            page_objects.insert(page_id, page);
        }
        all_objects.append(&mut doc.objects);
    }

    let mut merged = Document::with_version("1.5");
    let mut catalog: Option<(ObjectId, Dictionary)> = None;
    let mut pages_root: Option<(ObjectId, Dictionary)> = None;

    for (object_id, object) in all_objects {
        let kind: Option<Vec<u8>> = object
            .as_dict()
            .ok()
            .and_then(|dict| dict.get(b"Type").ok())
            .and_then(|t| t.as_name().ok())
            .map(|name| name.to_vec());
        match kind.as_deref() {
            Some(n) if n == b"Catalog" => {
                if catalog.is_none() {
                    if let Ok(dict) = object.as_dict() {
                        catalog = Some((object_id, dict.clone()));
                    }
                }
            }
            Some(n) if n == b"Pages" => {
                // Fold every source page-tree node into one root, keeping
                // the first node's id for the rebuilt tree.
                if let Ok(dict) = object.as_dict() {
                    match pages_root {
                        Some((_, ref mut merged_dict)) => {
                            for (key, value) in dict.iter() {
                                merged_dict.set(key.clone(), value.clone());
                            }
                        }
                        None => pages_root = Some((object_id, dict.clone())),
                    }
                }
            }
            // Pages are re-inserted below with a corrected parent; outline
            // trees reference objects across documents and are dropped.
            Some(n) if n == b"Page" || n == b"Outlines" || n == b"Outline" => {}
            _ => {
                merged.objects.insert(object_id, object);
            }
        }
    }

    let (pages_id, mut pages_dict) = pages_root
        .ok_or_else(|| OperationError::InvalidStructure("no page tree root found".into()))?;
    let (catalog_id, mut catalog_dict) = catalog
        .ok_or_else(|| OperationError::InvalidStructure("no document catalog found".into()))?;

    for (page_id, page) in page_objects {
        if let Ok(dict) = page.as_dict() {
            let mut dict = dict.clone();
            dict.set("Parent", pages_id);
            merged.objects.insert(page_id, Object::Dictionary(dict));
        }
    }

    pages_dict.set("Count", kid_ids.len() as i64);
    pages_dict.set(
        "Kids",
        kid_ids
            .iter()
            .map(|id| Object::Reference(*id))
            .collect::<Vec<_>>(),
    );
    merged.objects.insert(pages_id, Object::Dictionary(pages_dict));

    catalog_dict.set("Pages", pages_id);
    catalog_dict.remove(b"Outlines");
    merged
        .objects
        .insert(catalog_id, Object::Dictionary(catalog_dict));

    merged.trailer.set("Root", catalog_id);
    merged.max_id = merged.objects.len() as u32;
    merged.renumber_objects();
    merged.compress();

    let name = naming::artifact_name("pdf");
    merged.save(output_dir.join(&name))?;
    debug!(inputs = inputs.len(), pages = kid_ids.len(), artifact = %name, "merged documents");
    Ok(name)
}
