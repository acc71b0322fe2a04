//! # pdfmill-api
//!
//! HTTP server for pdfmill: multipart PDF uploads dispatched to a fixed
//! registry of transformations, with artifacts served back from the
//! processed-files area.
//!

mod api;
pub mod config;
pub mod registry;
pub mod state;
pub mod storage;

pub use api::{app, download, health_check, list_tools, upload, AppError, ErrorResponse, UploadResponse};
pub use config::AppConfig;
pub use state::AppState;
