//! Filename sanitizing and collision-resistant name generation.
//!
//! Staged uploads and output artifacts share one filesystem namespace with
//! every other in-flight request, so every generated name carries either a
//! timestamp+random suffix (staged inputs) or a UUID (artifacts).

use chrono::Local;
use rand::Rng;
use std::collections::HashSet;
use uuid::Uuid;

/// Placeholder used when sanitizing leaves nothing usable.
const FALLBACK_NAME: &str = "file";

/// Reduce a client-supplied filename to a safe form.
///
/// Keeps only the final path component, retains ASCII alphanumerics and
/// `._-`, collapses whitespace runs to a single underscore and drops
/// everything else. Leading dots are stripped so a name can never resolve
/// to a hidden file or a bare extension. Total: any input maps to a
/// non-empty name, falling back to `"file"`.
pub fn sanitize(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);

    let mut out = String::with_capacity(base.len());
    let mut last_was_space = false;
    for ch in base.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-') {
            out.push(ch);
            last_was_space = false;
        } else if ch.is_whitespace() {
            if !last_was_space && !out.is_empty() {
                out.push('_');
                last_was_space = true;
            }
        }
    }

    let cleaned = out.trim_start_matches('.').trim_end_matches('_');
    if cleaned.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Timestamp+random fragment for staged input names: `yymmddHHMMSS_NNN`.
pub fn unique_suffix() -> String {
    let stamp = Local::now().format("%y%m%d%H%M%S");
    let tag: u16 = rand::thread_rng().gen_range(100..1000);
    format!("{stamp}_{tag}")
}

/// UUID-based artifact name, e.g. `3f2b….pdf`.
///
/// Uniqueness is by generation; callers never probe the output area for
/// collisions.
pub fn artifact_name(extension: &str) -> String {
    format!("{}.{}", Uuid::new_v4(), extension)
}

/// Sanitized name with a uniqueness suffix inserted before the extension.
pub fn staged_name(original: &str) -> String {
    let safe = sanitize(original);
    match safe.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}_{}.{ext}", unique_suffix()),
        None => format!("{safe}_{}", unique_suffix()),
    }
}

/// Extension allow-list check on the raw client-supplied name.
pub fn has_allowed_extension(name: &str, allowed: &HashSet<String>) -> bool {
    match name.rsplit_once('.') {
        Some((_, ext)) => allowed.contains(&ext.to_ascii_lowercase()),
        None => false,
    }
}
