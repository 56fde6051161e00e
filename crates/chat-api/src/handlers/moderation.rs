//! Moderation handlers
//!
//! Mute, suspend and role changes on `/users/{id}`. Rank checks live in the
//! service; these only route.

use axum::{extract::State, Json};
use chat_service::dto::{ChangeRoleRequest, MuteRequest, SuspendRequest, UserResponse};
use chat_service::ModerationService;

use crate::extractors::{AuthUser, IdPath, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// POST /api/users/{id}/mute
pub async fn mute_user(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(target_id): IdPath,
    ValidatedJson(request): ValidatedJson<MuteRequest>,
) -> ApiResult<Json<UserResponse>> {
    let service = ModerationService::new(state.service_context());
    let response = service.mute(auth.user_id, target_id, request).await?;
    Ok(Json(response))
}

/// POST /api/users/{id}/unmute
pub async fn unmute_user(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(target_id): IdPath,
) -> ApiResult<Json<UserResponse>> {
    let service = ModerationService::new(state.service_context());
    let response = service.unmute(auth.user_id, target_id).await?;
    Ok(Json(response))
}

/// POST /api/users/{id}/suspend
pub async fn suspend_user(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(target_id): IdPath,
    ValidatedJson(request): ValidatedJson<SuspendRequest>,
) -> ApiResult<Json<UserResponse>> {
    let service = ModerationService::new(state.service_context());
    let response = service.suspend(auth.user_id, target_id, request).await?;
    Ok(Json(response))
}

/// POST /api/users/{id}/unsuspend
pub async fn unsuspend_user(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(target_id): IdPath,
) -> ApiResult<Json<UserResponse>> {
    let service = ModerationService::new(state.service_context());
    let response = service.unsuspend(auth.user_id, target_id).await?;
    Ok(Json(response))
}

/// PATCH /api/users/{id}/role
pub async fn change_role(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(target_id): IdPath,
    ValidatedJson(request): ValidatedJson<ChangeRoleRequest>,
) -> ApiResult<Json<UserResponse>> {
    let service = ModerationService::new(state.service_context());
    let response = service.change_role(auth.user_id, target_id, request).await?;
    Ok(Json(response))
}
