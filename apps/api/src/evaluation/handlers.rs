//! Axum route handlers for the Evaluation API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::evaluation::analyzer::analyze_resume;
use crate::evaluation::model::EvaluationResult;
use crate::pdf::extract_text_and_pages;
use crate::state::AppState;

const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub pages_detected: usize,
    pub ai_feedback: EvaluationResult,
    pub raw_text: String,
}

/// POST /upload
///
/// Accepts a multipart form with a `file` field holding a PDF resume.
/// Model failures do not surface as errors: `ai_feedback` then carries the degraded result.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }
        if field.content_type() != Some(PDF_CONTENT_TYPE) {
            return Err(AppError::Validation("Please upload a PDF file".to_string()));
        }
        upload = Some(field.bytes().await?);
        break;
    }

    let bytes =
        upload.ok_or_else(|| AppError::Validation("Missing 'file' form field".to_string()))?;
    info!(bytes = bytes.len(), "Resume upload received");

    let extracted = tokio::task::spawn_blocking(move || extract_text_and_pages(&bytes))
        .await
        .map_err(|e| AppError::Internal(e.into()))??;

    let ai_feedback = analyze_resume(state.model.as_ref(), &extracted.text, extracted.pages).await;
    if ai_feedback.is_degraded() {
        warn!("Returning degraded evaluation for upload");
    }

    Ok(Json(UploadResponse {
        status: "success",
        pages_detected: extracted.pages,
        ai_feedback,
        raw_text: extracted.text,
    }))
}
