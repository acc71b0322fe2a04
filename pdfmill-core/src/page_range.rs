//! Page range parsing for the split operation.
//!
//! Accepts user input like `"1-2, 4"`: comma-separated tokens, each either a
//! single 1-based page number or an inclusive `start-end` range. The result
//! is a deduplicated, ascending list of 0-based indices.

use crate::error::{OperationError, OperationResult};
use std::collections::BTreeSet;

/// Parse a range specification against a document of `max_pages` pages.
///
/// Whitespace is ignored and empty tokens are skipped, so `"1-2, ,4"` is
/// the same as `"1-2,4"`. Token order does not affect the output order.
pub fn parse_page_ranges(spec: &str, max_pages: usize) -> OperationResult<Vec<usize>> {
    let cleaned: String = spec.chars().filter(|c| !c.is_whitespace()).collect();
    let mut pages = BTreeSet::new();

    for part in cleaned.split(',') {
        if part.is_empty() {
            continue;
        }
        if let Some((start_str, end_str)) = part.split_once('-') {
            let bounds = start_str
                .parse::<usize>()
                .ok()
                .zip(end_str.parse::<usize>().ok())
                .filter(|&(start, end)| start >= 1 && start <= end && end <= max_pages);
            let (start, end) =
                bounds.ok_or_else(|| OperationError::InvalidRangeFormat(part.to_string()))?;
            pages.extend(start - 1..end);
        } else {
            let page = part
                .parse::<usize>()
                .map_err(|_| OperationError::InvalidPageNumber(part.to_string()))?;
            if page < 1 || page > max_pages {
                return Err(OperationError::PageOutOfBounds(page));
            }
            pages.insert(page - 1);
        }
    }

    Ok(pages.into_iter().collect())
}
