use crate::registry::ToolContext;
use crate::state::AppState;
use crate::storage::StagedBatch;
use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use pdfmill_core::OperationError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

/// Standard error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message describing what went wrong
    pub error: String,
}

/// Response for a successful upload: where to fetch the artifact.
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub download_url: String,
    pub filename: String,
}

/// Application-specific error types for the API
#[derive(Debug)]
pub enum AppError {
    /// Request is malformed before dispatch (missing file part, disallowed
    /// extension, unknown tool).
    BadRequest(String),
    /// The client can fix its input (wrong file count, bad range, wrong
    /// password, ...).
    Validation(String),
    /// Something failed on our side or in an underlying library/process.
    Internal(String),
    /// The requested artifact does not exist.
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Validation(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AppError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<OperationError> for AppError {
    fn from(err: OperationError) -> Self {
        if err.is_validation() {
            AppError::Validation(err.to_string())
        } else {
            AppError::Internal(err.to_string())
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Build the application router with all routes configured
pub fn app(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/api/upload/{tool}", post(upload))
        .route("/api/upload/{tool}/", post(upload))
        .route("/download/{filename}", get(download))
        .route("/api/tools", get(list_tools))
        .route("/api/health", get(health_check))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint for monitoring and load balancing
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "pdfmill API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// The registered tool slugs.
pub async fn list_tools(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({ "tools": state.registry.slugs() }))
}

/// Upload one or more PDFs and run the selected transformation.
///
/// Pipeline per request: stage every accepted file under a unique name,
/// look up the tool, validate arity and parameters, dispatch on a blocking
/// thread, and clean the staged inputs up on every exit path — the staged
/// batch removes whatever is left when it goes out of scope.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    Path(tool): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut staged = StagedBatch::new();
    let mut params: HashMap<String, String> = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart field: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name == "files" || field_name == "files[]" {
            let original_name = field.file_name().unwrap_or("").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {e}")))?;

            if original_name.is_empty() || !state.config.is_allowed_file(&original_name) {
                return Err(AppError::BadRequest(
                    "Invalid or no file selected".to_string(),
                ));
            }
            staged.push(state.storage.stage(&original_name, &data).await?);
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read form field: {e}")))?;
            params.insert(field_name, value);
        }
    }

    if staged.is_empty() {
        return Err(AppError::BadRequest("No file part".to_string()));
    }

    // Tool lookup runs after staging on purpose: an unknown tool must still
    // leave a clean ingest area, which the staged batch guarantees.
    let spec = state
        .registry
        .lookup(&tool)
        .ok_or_else(|| AppError::BadRequest("Invalid tool selected.".to_string()))?;
    spec.validate_arity(staged.len())
        .map_err(|message| AppError::Validation(message.to_string()))?;
    spec.validate_params(&params)
        .map_err(|message| AppError::Validation(message.to_string()))?;

    let context = ToolContext {
        inputs: staged.paths(),
        params,
        output_dir: state.config.processed_dir.clone(),
    };
    let run = spec.run;
    let slug = spec.slug;
    let filename = tokio::task::spawn_blocking(move || run(&context))
        .await
        .map_err(|e| {
            error!(tool = slug, error = %e, "transformation task failed");
            AppError::Internal(format!("{slug} processing failed unexpectedly"))
        })?
        .map_err(|err| {
            info!(tool = slug, error = %err, "transformation rejected");
            AppError::from(err)
        })?;

    Ok(Json(UploadResponse {
        download_url: format!("/download/{filename}"),
        filename,
    }))
}

/// Stream a generated artifact as an attachment.
///
/// The name must resolve strictly within the output area; anything that
/// smells like a path is treated as absent.
pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
    {
        return Err(AppError::NotFound("File not found".to_string()));
    }

    let path = state.storage.processed_dir().join(&filename);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| AppError::NotFound("File not found".to_string()))?;

    let content_type = match path.extension().and_then(|ext| ext.to_str()) {
        Some("pdf") => "application/pdf",
        Some("zip") => "application/zip",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        _ => "application/octet-stream",
    };

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
