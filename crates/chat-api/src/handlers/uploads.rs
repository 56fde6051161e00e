//! Media upload handler
//!
//! The body is the raw file; its `Content-Type` decides image or video.

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap},
    Json,
};
use chat_service::dto::UploadResponse;
use chat_service::UploadService;

use crate::extractors::AuthUser;
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// POST /api/upload
pub async fn upload(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Created<Json<UploadResponse>>> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    tracing::debug!(user_id = %auth.user_id, content_type, size = body.len(), "Upload received");

    let service = UploadService::new(state.service_context());
    let response = service.store(content_type, &body).await?;
    Ok(Created(Json(response)))
}
