//! Size reduction via Ghostscript's `pdfwrite` device.

use crate::error::{OperationError, OperationResult};
use crate::naming;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use tracing::debug;

const GHOSTSCRIPT: &str = if cfg!(windows) { "gswin64c" } else { "gs" };

/// Ghostscript `-dPDFSETTINGS` presets, lowest quality first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Screen,
    Ebook,
    Printer,
    Prepress,
}

impl Quality {
    fn setting(self) -> &'static str {
        match self {
            Quality::Screen => "/screen",
            Quality::Ebook => "/ebook",
            Quality::Printer => "/printer",
            Quality::Prepress => "/prepress",
        }
    }
}

impl Default for Quality {
    fn default() -> Self {
        Quality::Ebook
    }
}

/// Whether the Ghostscript binary can be invoked on this system.
pub fn ghostscript_available() -> bool {
    Command::new(GHOSTSCRIPT)
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// Rewrite `input` through Ghostscript at the given quality preset.
pub fn compress_pdf(input: &Path, quality: Quality, output_dir: &Path) -> OperationResult<String> {
    let name = naming::artifact_name("pdf");
    let output_path = output_dir.join(&name);

    let output = Command::new(GHOSTSCRIPT)
        .args(["-sDEVICE=pdfwrite", "-dCompatibilityLevel=1.4"])
        .arg(format!("-dPDFSETTINGS={}", quality.setting()))
        .args(["-dNOPAUSE", "-dQUIET", "-dBATCH"])
        .arg(format!("-sOutputFile={}", output_path.display()))
        .arg(input)
        .output()
        .map_err(spawn_error)?;

    if !output.status.success() {
        return Err(OperationError::ExternalTool {
            tool: GHOSTSCRIPT,
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    if !output_path.exists() {
        return Err(OperationError::ExternalTool {
            tool: GHOSTSCRIPT,
            detail: "no output was produced".to_string(),
        });
    }

    debug!(quality = ?quality, artifact = %name, "compressed document");
    Ok(name)
}

fn spawn_error(err: std::io::Error) -> OperationError {
    if err.kind() == ErrorKind::NotFound {
        OperationError::ToolUnavailable(GHOSTSCRIPT)
    } else {
        OperationError::Io(err)
    }
}
