//! Page extraction ("split").
//!
//! Keeps the pages selected by a range specification and drops the rest.
//! Selected pages come out in ascending page order whatever the order of
//! the range tokens.

use crate::error::{OperationError, OperationResult};
use crate::naming;
use crate::page_range::parse_page_ranges;
use lopdf::Document;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Extract the pages named by `ranges` (e.g. `"1-2,4"`) into a new PDF.
pub fn split_pdf(input: &Path, ranges: &str, output_dir: &Path) -> OperationResult<String> {
    let mut doc = Document::load(input)?;
    let total_pages = doc.get_pages().len();

    let selected = parse_page_ranges(ranges, total_pages)?;
    if selected.is_empty() {
        return Err(OperationError::EmptySelection);
    }

    let keep: HashSet<u32> = selected.iter().map(|idx| *idx as u32 + 1).collect();
    let delete: Vec<u32> = (1..=total_pages as u32)
        .filter(|page| !keep.contains(page))
        .collect();
    if !delete.is_empty() {
        doc.delete_pages(&delete);
    }
    doc.renumber_objects();

    let name = naming::artifact_name("pdf");
    doc.save(output_dir.join(&name))?;
    debug!(kept = keep.len(), dropped = delete.len(), artifact = %name, "split document");
    Ok(name)
}
