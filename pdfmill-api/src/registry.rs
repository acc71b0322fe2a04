//! Fixed table of upload tools.
//!
//! Each entry carries the file arity rule, the required parameters and the
//! transformation function, so adding a tool is one new entry rather than
//! a new dispatch branch. The registry is built once at startup and only
//! read afterwards, which makes it safe to share across in-flight
//! requests.

use pdfmill_core::operations::{self, OperationError, Quality};
use std::collections::HashMap;
use std::path::PathBuf;

/// How many input files a tool accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileArity {
    Exactly(usize),
    AtLeast(usize),
}

impl FileArity {
    fn accepts(self, count: usize) -> bool {
        match self {
            FileArity::Exactly(n) => count == n,
            FileArity::AtLeast(n) => count >= n,
        }
    }
}

/// A required string parameter and the message reported when it is absent.
#[derive(Debug, Clone, Copy)]
pub struct ParamRule {
    pub name: &'static str,
    pub missing_message: &'static str,
    /// Whether an empty value satisfies the rule (the unlock password may
    /// legitimately be the empty string).
    pub allow_empty: bool,
}

/// Everything a transformation needs: staged inputs in upload order, the
/// free-form string parameters and the output area.
#[derive(Debug)]
pub struct ToolContext {
    pub inputs: Vec<PathBuf>,
    pub params: HashMap<String, String>,
    pub output_dir: PathBuf,
}

impl ToolContext {
    fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

pub type ToolFn = fn(&ToolContext) -> Result<String, OperationError>;

/// One registered transformation.
pub struct ToolSpec {
    pub slug: &'static str,
    pub arity: FileArity,
    pub arity_message: &'static str,
    pub required_params: &'static [ParamRule],
    pub run: ToolFn,
}

impl ToolSpec {
    pub fn validate_arity(&self, file_count: usize) -> Result<(), &'static str> {
        if self.arity.accepts(file_count) {
            Ok(())
        } else {
            Err(self.arity_message)
        }
    }

    pub fn validate_params(&self, params: &HashMap<String, String>) -> Result<(), &'static str> {
        for rule in self.required_params {
            match params.get(rule.name) {
                Some(value) if rule.allow_empty || !value.is_empty() => {}
                _ => return Err(rule.missing_message),
            }
        }
        Ok(())
    }
}

pub struct ToolRegistry {
    tools: HashMap<&'static str, ToolSpec>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        let mut tools = HashMap::new();
        for spec in Self::specs() {
            tools.insert(spec.slug, spec);
        }
        Self { tools }
    }

    pub fn lookup(&self, slug: &str) -> Option<&ToolSpec> {
        self.tools.get(slug)
    }

    /// Registered slugs, sorted for stable listings.
    pub fn slugs(&self) -> Vec<&'static str> {
        let mut slugs: Vec<_> = self.tools.keys().copied().collect();
        slugs.sort_unstable();
        slugs
    }

    fn specs() -> Vec<ToolSpec> {
        vec![
            ToolSpec {
                slug: "merge",
                arity: FileArity::AtLeast(2),
                arity_message: "Merge requires at least two files.",
                required_params: &[],
                run: run_merge,
            },
            ToolSpec {
                slug: "split",
                arity: FileArity::Exactly(1),
                arity_message: "Split requires exactly one file.",
                required_params: &[ParamRule {
                    name: "ranges",
                    missing_message: "Page ranges are required for splitting.",
                    allow_empty: false,
                }],
                run: run_split,
            },
            ToolSpec {
                slug: "compress",
                arity: FileArity::Exactly(1),
                arity_message: "Compress requires exactly one file.",
                required_params: &[],
                run: run_compress,
            },
            ToolSpec {
                slug: "rotate",
                arity: FileArity::Exactly(1),
                arity_message: "Rotate requires exactly one file.",
                required_params: &[],
                run: run_rotate,
            },
            ToolSpec {
                slug: "add-page-numbers",
                arity: FileArity::Exactly(1),
                arity_message: "This tool requires exactly one file.",
                required_params: &[],
                run: run_page_numbers,
            },
            ToolSpec {
                slug: "add-watermark",
                arity: FileArity::Exactly(1),
                arity_message: "Watermark requires exactly one file.",
                required_params: &[ParamRule {
                    name: "text",
                    missing_message: "Watermark text is required.",
                    allow_empty: false,
                }],
                run: run_watermark,
            },
            ToolSpec {
                slug: "unlock-pdf",
                arity: FileArity::Exactly(1),
                arity_message: "Unlock requires exactly one file.",
                required_params: &[ParamRule {
                    name: "password",
                    missing_message: "Password is required to unlock the PDF.",
                    allow_empty: true,
                }],
                run: run_unlock,
            },
            ToolSpec {
                slug: "pdf-to-word",
                arity: FileArity::Exactly(1),
                arity_message: "PDF to Word requires exactly one file.",
                required_params: &[],
                run: run_to_word,
            },
            ToolSpec {
                slug: "pdf-to-jpg",
                arity: FileArity::Exactly(1),
                arity_message: "PDF to JPG requires exactly one file.",
                required_params: &[],
                run: run_to_images,
            },
        ]
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn run_merge(ctx: &ToolContext) -> Result<String, OperationError> {
    operations::merge_pdfs(&ctx.inputs, &ctx.output_dir)
}

fn run_split(ctx: &ToolContext) -> Result<String, OperationError> {
    let ranges = ctx.param("ranges").unwrap_or_default();
    operations::split_pdf(&ctx.inputs[0], ranges, &ctx.output_dir)
}

fn run_compress(ctx: &ToolContext) -> Result<String, OperationError> {
    operations::compress_pdf(&ctx.inputs[0], Quality::default(), &ctx.output_dir)
}

fn run_rotate(ctx: &ToolContext) -> Result<String, OperationError> {
    let raw = ctx.param("angle").unwrap_or("90");
    let angle = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| OperationError::InvalidAngle(raw.trim().to_string()))?;
    operations::rotate_pdf(&ctx.inputs[0], angle, &ctx.output_dir)
}

fn run_page_numbers(ctx: &ToolContext) -> Result<String, OperationError> {
    operations::add_page_numbers(&ctx.inputs[0], &ctx.output_dir)
}

fn run_watermark(ctx: &ToolContext) -> Result<String, OperationError> {
    let text = ctx.param("text").unwrap_or_default();
    operations::add_watermark(&ctx.inputs[0], text, &ctx.output_dir)
}

fn run_unlock(ctx: &ToolContext) -> Result<String, OperationError> {
    let password = ctx.param("password").unwrap_or_default();
    operations::unlock_pdf(&ctx.inputs[0], password, &ctx.output_dir)
}

fn run_to_word(ctx: &ToolContext) -> Result<String, OperationError> {
    operations::pdf_to_word(&ctx.inputs[0], &ctx.output_dir)
}

fn run_to_images(ctx: &ToolContext) -> Result<String, OperationError> {
    operations::pdf_to_images(&ctx.inputs[0], &ctx.output_dir)
}
