//! Axum route handler for resume generation.

use axum::{
    extract::rejection::JsonRejection,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::resume::ResumeRecord;
use crate::resume::assembler::{assemble, GenerationError};
use crate::resume::validation::validate_record;

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const DOCX_DISPOSITION: &str = "attachment; filename=\"Resume.docx\"";

/// POST /api/generate-resume
///
/// Validates the posted resume, renders it, and returns `Resume.docx` as an
/// attachment. Packing runs on the blocking pool.
pub async fn handle_generate_resume(
    payload: Result<Json<ResumeRecord>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(record) = payload?;
    validate_record(&record)?;

    let buffer = tokio::task::spawn_blocking(move || assemble(&record))
        .await
        .map_err(|e| {
            error!("Resume assembly task failed: {e}");
            GenerationError
        })??;

    info!(bytes = buffer.len(), "Resume generated");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, DOCX_CONTENT_TYPE),
            (header::CONTENT_DISPOSITION, DOCX_DISPOSITION),
        ],
        Bytes::from(buffer),
    ))
}
