//! Room handlers
//!
//! Listing, creation, membership and management of rooms.

use axum::{extract::State, Json};
use chat_service::dto::{
    CreateRoomRequest, JoinRoomRequest, LeaveRoomResponse, RoomResponse, UpdateRoomRequest,
    UserResponse,
};
use chat_service::RoomService;

use crate::extractors::{AuthUser, IdPath, OptionalValidatedJson, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Public rooms plus the caller's private rooms
///
/// GET /api/rooms
pub async fn list_rooms(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<RoomResponse>>> {
    let service = RoomService::new(state.service_context());
    let rooms = service.list_rooms(auth.user_id).await?;
    Ok(Json(rooms))
}

/// POST /api/rooms
pub async fn create_room(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateRoomRequest>,
) -> ApiResult<Created<Json<RoomResponse>>> {
    let service = RoomService::new(state.service_context());
    let response = service.create_room(auth.user_id, request).await?;
    Ok(Created(Json(response)))
}

/// GET /api/rooms/{id}
pub async fn get_room(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(room_id): IdPath,
) -> ApiResult<Json<RoomResponse>> {
    let service = RoomService::new(state.service_context());
    let response = service.get_room(room_id, auth.user_id).await?;
    Ok(Json(response))
}

/// Rename a room
///
/// PATCH /api/rooms/{id}
pub async fn update_room(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(room_id): IdPath,
    ValidatedJson(request): ValidatedJson<UpdateRoomRequest>,
) -> ApiResult<Json<RoomResponse>> {
    let service = RoomService::new(state.service_context());
    let response = service.rename_room(room_id, auth.user_id, request).await?;
    Ok(Json(response))
}

/// DELETE /api/rooms/{id}
pub async fn delete_room(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(room_id): IdPath,
) -> ApiResult<NoContent> {
    let service = RoomService::new(state.service_context());
    service.delete_room(room_id, auth.user_id).await?;
    Ok(NoContent)
}

/// Join a room; private rooms need `invite_code`
///
/// POST /api/rooms/{id}/join
pub async fn join_room(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(room_id): IdPath,
    OptionalValidatedJson(request): OptionalValidatedJson<JoinRoomRequest>,
) -> ApiResult<Json<RoomResponse>> {
    let service = RoomService::new(state.service_context());
    let response = service.join_room(room_id, auth.user_id, request).await?;
    Ok(Json(response))
}

/// POST /api/rooms/{id}/leave
pub async fn leave_room(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(room_id): IdPath,
) -> ApiResult<Json<LeaveRoomResponse>> {
    let service = RoomService::new(state.service_context());
    let response = service.leave_room(room_id, auth.user_id).await?;
    Ok(Json(response))
}

/// POST /api/rooms/{id}/invite-code
pub async fn regenerate_invite_code(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(room_id): IdPath,
) -> ApiResult<Json<RoomResponse>> {
    let service = RoomService::new(state.service_context());
    let response = service.regenerate_invite_code(room_id, auth.user_id).await?;
    Ok(Json(response))
}

/// GET /api/rooms/{id}/members
pub async fn list_members(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(room_id): IdPath,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let service = RoomService::new(state.service_context());
    let members = service.list_members(room_id, auth.user_id).await?;
    Ok(Json(members))
}
