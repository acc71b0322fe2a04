//! Password removal via the `qpdf` binary.
//!
//! `qpdf --is-encrypted` distinguishes the "not encrypted" validation error
//! (exit code 2) from a genuinely locked document before the decryption
//! pass runs, so an unencrypted upload never produces an artifact.

use crate::error::{OperationError, OperationResult};
use crate::naming;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Command;
use tracing::debug;

const QPDF: &str = "qpdf";

/// Whether the `qpdf` binary can be invoked on this system.
pub fn qpdf_available() -> bool {
    Command::new(QPDF)
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// Decrypt `input` with `password` (empty string allowed) into a new
/// artifact. Fails with a validation error when the document is not
/// encrypted or the password is wrong.
pub fn unlock_pdf(input: &Path, password: &str, output_dir: &Path) -> OperationResult<String> {
    let probe = Command::new(QPDF)
        .arg("--is-encrypted")
        .arg(input)
        .output()
        .map_err(|e| spawn_error(QPDF, e))?;
    match probe.status.code() {
        Some(0) => {}
        Some(2) => return Err(OperationError::NotEncrypted),
        _ => {
            return Err(OperationError::ExternalTool {
                tool: QPDF,
                detail: String::from_utf8_lossy(&probe.stderr).trim().to_string(),
            })
        }
    }

    let name = naming::artifact_name("pdf");
    let output_path = output_dir.join(&name);
    let decrypt = Command::new(QPDF)
        .arg(format!("--password={password}"))
        .arg("--decrypt")
        .arg(input)
        .arg(&output_path)
        .output()
        .map_err(|e| spawn_error(QPDF, e))?;

    if !decrypt.status.success() {
        let stderr = String::from_utf8_lossy(&decrypt.stderr);
        if stderr.contains("invalid password") {
            return Err(OperationError::WrongPassword);
        }
        return Err(OperationError::ExternalTool {
            tool: QPDF,
            detail: stderr.trim().to_string(),
        });
    }

    debug!(artifact = %name, "decrypted document");
    Ok(name)
}

fn spawn_error(tool: &'static str, err: std::io::Error) -> OperationError {
    if err.kind() == ErrorKind::NotFound {
        OperationError::ToolUnavailable(tool)
    } else {
        OperationError::Io(err)
    }
}
