use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;

use super::error::AppError;
use super::models::{HealthResponse, MergeRequest, MergeResponse};
use crate::document::TableDocument;
use crate::utils::config::AppConfig;

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Cell/text merge endpoint
pub async fn merge_document(
    State(config): State<Arc<AppConfig>>,
    Json(request): Json<MergeRequest>,
) -> Result<Json<MergeResponse>, AppError> {
    tracing::info!("Received merge request");

    let merge_config = request.validated_config(&config.merge)?;
    let document = TableDocument::from_values(request.cells, request.ocr);
    let result = document.merge(&merge_config);

    tracing::info!(
        "Merge completed: {} cells with text, {} unassigned text items",
        result.metadata.cells_with_text,
        result.metadata.unassigned_text
    );

    Ok(Json(MergeResponse::success(result)))
}
