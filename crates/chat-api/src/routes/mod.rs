//! Route definitions
//!
//! All API routes organized by domain and mounted under /api.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::{auth, health, mentions, messages, moderation, rooms, typing, uploads, users};
use crate::state::AppState;

/// Create the main API router with all routes (excluding health for separate middleware handling)
pub fn create_router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new().nest("/api", api_routes(max_upload_bytes))
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::readiness_check))
}

fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(room_routes())
        .merge(message_routes())
        .merge(upload_routes(max_upload_bytes))
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Current user, user directory and moderation
fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/user",
            get(users::get_current_user)
                .patch(users::update_current_user)
                .delete(users::delete_current_user),
        )
        .route("/user/username", post(users::change_username))
        .route("/user/password", post(users::change_password))
        .route("/users", get(users::list_users))
        .route("/users/:id", get(users::get_user))
        .route("/users/:id/mute", post(moderation::mute_user))
        .route("/users/:id/unmute", post(moderation::unmute_user))
        .route("/users/:id/suspend", post(moderation::suspend_user))
        .route("/users/:id/unsuspend", post(moderation::unsuspend_user))
        .route("/users/:id/role", patch(moderation::change_role))
        .route("/mentions/unread", get(mentions::unread_mentions))
}

/// Room routes
fn room_routes() -> Router<AppState> {
    Router::new()
        .route("/rooms", get(rooms::list_rooms).post(rooms::create_room))
        .route(
            "/rooms/:id",
            get(rooms::get_room)
                .patch(rooms::update_room)
                .delete(rooms::delete_room),
        )
        .route("/rooms/:id/join", post(rooms::join_room))
        .route("/rooms/:id/leave", post(rooms::leave_room))
        .route("/rooms/:id/invite-code", post(rooms::regenerate_invite_code))
        .route("/rooms/:id/members", get(rooms::list_members))
        .route(
            "/rooms/:id/messages",
            get(messages::get_messages).post(messages::create_message),
        )
        .route(
            "/rooms/:id/typing",
            get(typing::list_typing).post(typing::set_typing),
        )
}

/// Single-message routes
fn message_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/messages/:id",
            patch(messages::update_message).delete(messages::delete_message),
        )
        .route("/messages/:id/mentions", post(messages::add_mentions))
}

/// Raw media upload with its own body limit
fn upload_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/upload", post(uploads::upload))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_upload_bytes))
}
