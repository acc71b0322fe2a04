use thiserror::Error;

/// Failures produced by the transformation operations.
///
/// The HTTP layer cares about one distinction only: whether the client can
/// fix the problem by changing its input ([`OperationError::is_validation`])
/// or whether something failed on our side.
#[derive(Error, Debug)]
pub enum OperationError {
    #[error("Invalid range format: {0}")]
    InvalidRangeFormat(String),

    #[error("Invalid page number: {0}")]
    InvalidPageNumber(String),

    #[error("Page number {0} is out of bounds.")]
    PageOutOfBounds(usize),

    #[error("No valid pages selected for extraction.")]
    EmptySelection,

    #[error("Invalid rotation angle: {0} (must be a multiple of 90)")]
    InvalidRotation(i64),

    #[error("Invalid rotation angle: {0}")]
    InvalidAngle(String),

    #[error("The provided PDF file is not encrypted.")]
    NotEncrypted,

    #[error("Incorrect password provided. Decryption failed.")]
    WrongPassword,

    #[error("Invalid PDF structure: {0}")]
    InvalidStructure(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Renderer error: {0}")]
    Renderer(String),

    #[error("Text extraction error: {0}")]
    Extraction(String),

    #[error("Document conversion error: {0}")]
    Conversion(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("{tool} failed: {detail}")]
    ExternalTool { tool: &'static str, detail: String },

    #[error("{0} is not available on this system")]
    ToolUnavailable(&'static str),
}

impl OperationError {
    /// True when the failure is correctable by the client (bad page range,
    /// wrong password, ...) rather than a fault of the service or of an
    /// underlying library/process.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            OperationError::InvalidRangeFormat(_)
                | OperationError::InvalidPageNumber(_)
                | OperationError::PageOutOfBounds(_)
                | OperationError::EmptySelection
                | OperationError::InvalidRotation(_)
                | OperationError::InvalidAngle(_)
                | OperationError::NotEncrypted
                | OperationError::WrongPassword
        )
    }
}

pub type OperationResult<T> = std::result::Result<T, OperationError>;
