//! User handlers
//!
//! The caller's own profile under `/user`, and the directory under `/users`.

use axum::{
    extract::{Query, State},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use chat_service::dto::{
    ChangePasswordRequest, ChangeUsernameRequest, CurrentUserResponse, DeleteAccountRequest,
    UpdateProfileRequest, UserResponse,
};
use chat_service::UserService;

use crate::extractors::{AuthUser, IdPath, OffsetParams, ValidatedJson};
use crate::handlers::auth::expired_session_cookie;
use crate::response::{ApiResult, NoContent};
use crate::state::AppState;

/// Get current user
///
/// GET /api/user
pub async fn get_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<CurrentUserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.get_current_user(auth.user_id).await?;
    Ok(Json(response))
}

/// Update appear-offline and avatar
///
/// PATCH /api/user
pub async fn update_current_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<Json<CurrentUserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.update_profile(auth.user_id, request).await?;
    Ok(Json(response))
}

/// Delete the caller's account and clear the session cookie
///
/// DELETE /api/user
pub async fn delete_current_user(
    State(state): State<AppState>,
    jar: CookieJar,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<DeleteAccountRequest>,
) -> ApiResult<(CookieJar, NoContent)> {
    UserService::new(state.service_context())
        .delete_account(auth.user_id, request)
        .await?;

    let jar = jar.remove(expired_session_cookie(&state.config().session));
    Ok((jar, NoContent))
}

/// POST /api/user/username
pub async fn change_username(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<ChangeUsernameRequest>,
) -> ApiResult<Json<CurrentUserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.change_username(auth.user_id, request).await?;
    Ok(Json(response))
}

/// POST /api/user/password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<ChangePasswordRequest>,
) -> ApiResult<NoContent> {
    UserService::new(state.service_context())
        .change_password(auth.user_id, request)
        .await?;
    Ok(NoContent)
}

/// List users with their visible online status
///
/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(params): Query<OffsetParams>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let (limit, offset) = params.resolve();
    let service = UserService::new(state.service_context());
    let users = service.list_users(limit, offset).await?;
    Ok(Json(users))
}

/// Get user by ID (public profile)
///
/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(user_id): IdPath,
) -> ApiResult<Json<UserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.get_user(user_id).await?;
    Ok(Json(response))
}
