//! Unread mention handlers

use axum::{extract::State, Json};
use chat_service::dto::MentionSummaryResponse;
use chat_service::MentionService;

use crate::extractors::AuthUser;
use crate::response::ApiResult;
use crate::state::AppState;

/// Per-room unread mention counts for the caller
///
/// GET /api/mentions/unread
pub async fn unread_mentions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<MentionSummaryResponse>>> {
    let service = MentionService::new(state.service_context());
    let summary = service.unread(auth.user_id).await?;
    Ok(Json(summary))
}
