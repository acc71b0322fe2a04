//! Word-processor export: extracted text re-flowed into a `.docx`.
//!
//! Layout is not reconstructed; each extracted line becomes one paragraph.

use crate::error::{OperationError, OperationResult};
use crate::naming;
use docx_rs::{Docx, Paragraph, Run};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// Convert `input` into a `.docx` artifact.
pub fn pdf_to_word(input: &Path, output_dir: &Path) -> OperationResult<String> {
    let text = pdf_extract::extract_text(input)
        .map_err(|e| OperationError::Extraction(e.to_string()))?;

    let name = naming::artifact_name("docx");
    let file = File::create(output_dir.join(&name))?;

    let mut docx = Docx::new();
    let mut paragraphs = 0;
    for line in text.lines() {
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(line)));
        paragraphs += 1;
    }
    if paragraphs == 0 {
        // A document with no body parts confuses some readers.
        docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text("")));
    }

    docx.build()
        .pack(file)
        .map_err(|e| OperationError::Conversion(e.to_string()))?;

    debug!(paragraphs, artifact = %name, "converted document to docx");
    Ok(name)
}
