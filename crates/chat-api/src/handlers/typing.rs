//! Typing indicator handlers

use axum::{extract::State, Json};
use chat_service::dto::{TypingRequest, TypingUserResponse};
use chat_service::TypingService;

use crate::extractors::{AuthUser, IdPath, ValidatedJson};
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// GET /api/rooms/{id}/typing
pub async fn list_typing(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(room_id): IdPath,
) -> ApiResult<Json<Vec<TypingUserResponse>>> {
    let service = TypingService::new(state.service_context());
    let typing = service.list_typing(room_id, auth.user_id).await?;
    Ok(Json(typing))
}

/// POST /api/rooms/{id}/typing
pub async fn set_typing(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(room_id): IdPath,
    ValidatedJson(request): ValidatedJson<TypingRequest>,
) -> ApiResult<NoContent> {
    let service = TypingService::new(state.service_context());
    service
        .set_typing(room_id, auth.user_id, request.typing)
        .await?;
    Ok(NoContent)
}
