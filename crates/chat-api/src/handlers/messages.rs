//! Message handlers
//!
//! Room timelines and single-message edits, deletes and mention top-ups.

use axum::{extract::State, Json};
use chat_service::dto::{
    AddMentionsRequest, CreateMessageRequest, MessageResponse, RecordedMentionsResponse,
    UpdateMessageRequest,
};
use chat_service::MessageService;

use crate::extractors::{AuthUser, IdPath, Pagination, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Messages visible to the caller, newest first
///
/// GET /api/rooms/{id}/messages
pub async fn get_messages(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(room_id): IdPath,
    pagination: Pagination,
) -> ApiResult<Json<Vec<MessageResponse>>> {
    let service = MessageService::new(state.service_context());
    let messages = service
        .list_messages(room_id, auth.user_id, pagination.into())
        .await?;
    Ok(Json(messages))
}

/// Create message
///
/// POST /api/rooms/{id}/messages
pub async fn create_message(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(room_id): IdPath,
    ValidatedJson(request): ValidatedJson<CreateMessageRequest>,
) -> ApiResult<Created<Json<MessageResponse>>> {
    let service = MessageService::new(state.service_context());
    let response = service.create_message(room_id, auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// Edit message
///
/// PATCH /api/messages/{id}
pub async fn update_message(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(message_id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateMessageRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let service = MessageService::new(state.service_context());
    let response = service
        .update_message(message_id, auth.user_id, request)
        .await?;
    Ok(Json(response))
}

/// Delete message
///
/// DELETE /api/messages/{id}
pub async fn delete_message(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(message_id): IdPath,
) -> ApiResult<NoContent> {
    let service = MessageService::new(state.service_context());
    service.delete_message(message_id, auth.user_id).await?;
    Ok(NoContent)
}

/// POST /api/messages/{id}/mentions
pub async fn add_mentions(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(message_id): IdPath,
    ValidatedJson(request): ValidatedJson<AddMentionsRequest>,
) -> ApiResult<Json<RecordedMentionsResponse>> {
    let service = MessageService::new(state.service_context());
    let response = service.add_mentions(message_id, auth.user_id, request).await?;
    Ok(Json(response))
}
