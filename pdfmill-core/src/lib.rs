//! # pdfmill-core
//!
//! Transformation operations behind the pdfmill web service: merge, split,
//! compress, rotate, page numbering, watermarking, decryption and
//! conversion to image archives or word-processor documents.
//!
//! Structural PDF editing is delegated to `lopdf`, rasterization to
//! `pdfium-render`, text extraction to `pdf-extract` and `.docx` output to
//! `docx-rs`; compression and decryption shell out to Ghostscript and
//! qpdf. Nothing here knows about HTTP: operations receive staged input
//! paths and an output directory and return the generated artifact name.

pub mod error;
pub mod naming;
pub mod operations;
pub mod page_range;

#[cfg(test)]
pub(crate) mod test_pdf;

pub use error::{OperationError, OperationResult};
pub use page_range::parse_page_ranges;
