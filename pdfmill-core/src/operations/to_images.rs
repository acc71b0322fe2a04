//! Page rasterization into a JPEG archive.
//!
//! Pages are rendered through pdfium into a transient per-request subfolder
//! of the output area, zipped into a single archive, and the subfolder is
//! removed once the archive is written. The pdfium library is bound per
//! call; a missing library surfaces as an internal error, never a panic.

use crate::error::{OperationError, OperationResult};
use crate::naming;
use pdfium_render::prelude::*;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::debug;
use uuid::Uuid;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Longest rendered edge in pixels; roughly A4 at 150 DPI.
const MAX_RENDER_PIXELS: i32 = 1754;

/// Whether a pdfium library can be bound on this system.
pub fn pdfium_available() -> bool {
    bind_pdfium().is_ok()
}

fn bind_pdfium() -> Result<Pdfium, PdfiumError> {
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
        .or_else(|_| Pdfium::bind_to_system_library())?;
    Ok(Pdfium::new(bindings))
}

/// Render every page of `input` to JPEG and return the name of a zip
/// archive containing `page_1.jpg` .. `page_N.jpg`.
pub fn pdf_to_images(input: &Path, output_dir: &Path) -> OperationResult<String> {
    let pdfium = bind_pdfium()
        .map_err(|e| OperationError::Renderer(format!("failed to bind pdfium: {e:?}")))?;
    let document = pdfium
        .load_pdf_from_file(input, None)
        .map_err(|e| OperationError::Renderer(format!("failed to open document: {e:?}")))?;

    let image_dir = output_dir.join(Uuid::new_v4().to_string());
    std::fs::create_dir_all(&image_dir)?;

    let render_config = PdfRenderConfig::new()
        .set_target_width(MAX_RENDER_PIXELS)
        .set_maximum_height(MAX_RENDER_PIXELS);

    let mut image_files = Vec::new();
    {
        let pages = document.pages();
        for (index, page) in pages.iter().enumerate() {
            let bitmap = page
                .render_with_config(&render_config)
                .map_err(|e| OperationError::Renderer(format!("page {}: {e:?}", index + 1)))?;
            let file_name = format!("page_{}.jpg", index + 1);
            let file_path = image_dir.join(&file_name);
            bitmap
                .as_image()
                .to_rgb8()
                .save(&file_path)
                .map_err(|e| OperationError::Renderer(format!("page {}: {e}", index + 1)))?;
            image_files.push((file_name, file_path));
        }
    }
    drop(document);

    let name = naming::artifact_name("zip");
    let archive = File::create(output_dir.join(&name))?;
    let mut zip = ZipWriter::new(archive);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (file_name, file_path) in &image_files {
        zip.start_file(file_name.as_str(), options)
            .map_err(|e| OperationError::Archive(e.to_string()))?;
        zip.write_all(&std::fs::read(file_path)?)?;
    }
    zip.finish()
        .map_err(|e| OperationError::Archive(e.to_string()))?;

    std::fs::remove_dir_all(&image_dir)?;
    debug!(pages = image_files.len(), artifact = %name, "rendered document to images");
    Ok(name)
}
