//! PDF transformation operations.
//!
//! Each operation takes staged input paths plus its parameters, writes
//! exactly one uniquely-named artifact into the output directory and
//! returns the artifact's file name. Inputs are never mutated or deleted;
//! staged-file lifecycle belongs to the caller.
//!
//! Everything here does blocking file and process work and is meant to run
//! on a blocking thread (`tokio::task::spawn_blocking` in the service).

pub mod compress;
pub mod merge;
pub mod overlay;
pub mod rotate;
pub mod split;
pub mod to_images;
pub mod to_word;
pub mod unlock;

pub use compress::{compress_pdf, Quality};
pub use merge::merge_pdfs;
pub use overlay::{add_page_numbers, add_watermark};
pub use rotate::rotate_pdf;
pub use split::split_pdf;
pub use to_images::pdf_to_images;
pub use to_word::pdf_to_word;
pub use unlock::unlock_pdf;

pub use crate::error::{OperationError, OperationResult};
