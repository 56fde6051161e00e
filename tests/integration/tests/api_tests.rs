//! API Integration Tests
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Environment variables: DATABASE_URL, JWT_SECRET
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_error, assert_json, assert_status, check_test_env, fixtures::*, TestServer,
};
use reqwest::StatusCode;
use serde_json::json;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.anonymous().get("/api/health").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.anonymous().get("/api/health/ready").await.unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ready");
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_register_sets_session_cookie() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let credentials = Credentials::unique("reg");
    let client = server.anonymous();

    let response = client.post("/api/register", &credentials).await.unwrap();
    let cookie = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let auth: AuthResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(auth.user.username, credentials.username);
    assert_eq!(auth.token_type, "Bearer");
    assert!(cookie.starts_with(&format!("{}=", server.config.session.cookie_name)));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
    assert!(cookie.contains("Path=/"));
    assert!(!cookie.contains("Secure"));

    // The cookie alone authenticates
    let response = client.get("/api/user").await.unwrap();
    let me: CurrentUser = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me.id, auth.user.id);
    assert!(me.online);
}

#[tokio::test]
async fn test_bearer_token_authenticates() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.register("bearer").await.unwrap();

    let response = server
        .anonymous()
        .client
        .get(format!("{}/api/user", server.base_url()))
        .bearer_auth(alice.token())
        .send()
        .await
        .unwrap();
    let me: CurrentUser = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me.username, alice.username());
}

#[tokio::test]
async fn test_missing_auth() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.anonymous().get("/api/user").await.unwrap();
    let body = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.error.code, "MISSING_AUTH");
}

#[tokio::test]
async fn test_register_duplicate_username() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.register("dup").await.unwrap();

    let again = json!({ "username": alice.username().to_uppercase(), "password": TEST_PASSWORD });
    let response = server.anonymous().post("/api/register", &again).await.unwrap();
    let body = assert_error(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(body.error.code, "USERNAME_TAKEN");
}

#[tokio::test]
async fn test_register_rejects_weak_password_and_bad_username() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let client = server.anonymous();

    let weak = json!({ "username": unique_username("weak"), "password": "password" });
    let response = client.post("/api/register", &weak).await.unwrap();
    let body = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "WEAK_PASSWORD");

    let reserved = json!({ "username": "everyone", "password": TEST_PASSWORD });
    let response = client.post("/api/register", &reserved).await.unwrap();
    let body = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "INVALID_USERNAME");
}

#[tokio::test]
async fn test_login_and_invalid_credentials() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.register("login").await.unwrap();
    let credentials = alice.credentials.clone().unwrap();

    let again = server.login(&credentials).await.unwrap();
    assert_eq!(again.id(), alice.id());

    let wrong = json!({ "username": credentials.username, "password": "WrongPass123" });
    let response = server.anonymous().post("/api/login", &wrong).await.unwrap();
    let body = assert_error(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(body.error.code, "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_logout_revokes_session() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.register("logout").await.unwrap();
    let token = alice.token().to_string();

    let response = alice.post_empty("/api/logout").await.unwrap();
    let removal = response
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
    assert!(removal.starts_with(&format!("{}=;", server.config.session.cookie_name)));
    assert!(removal.contains("Max-Age=0"));

    // Cookie cleared
    let response = alice.get("/api/user").await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();

    // The old token no longer maps to a session
    let response = server
        .anonymous()
        .client
        .get(format!("{}/api/user", server.base_url()))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// User Tests
// ============================================================================

#[tokio::test]
async fn test_appear_offline_hides_status() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.register("ghost").await.unwrap();
    let bob = server.register("viewer").await.unwrap();

    let response = alice
        .patch("/api/user", &json!({ "appear_offline": true }))
        .await
        .unwrap();
    let me: CurrentUser = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(me.appear_offline);

    let response = bob.get(&format!("/api/users/{}", alice.id())).await.unwrap();
    let seen: UserResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(!seen.online);
}

#[tokio::test]
async fn test_invalid_path_parameter() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.register("path").await.unwrap();

    let response = alice.get("/api/users/not-a-number").await.unwrap();
    let body = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "INVALID_PATH_PARAMETER");

    let response = alice.get("/api/users/1").await.unwrap();
    let body = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(body.error.code, "UNKNOWN_USER");
}

#[tokio::test]
async fn test_change_username_cooldown() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.register("rename").await.unwrap();

    let first = json!({ "new_username": unique_username("renamed"), "current_password": TEST_PASSWORD });
    let response = alice.post("/api/user/username", &first).await.unwrap();
    let me: CurrentUser = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(me.username, first["new_username"]);

    let second = json!({ "new_username": unique_username("again"), "current_password": TEST_PASSWORD });
    let response = alice.post("/api/user/username", &second).await.unwrap();
    let body = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "USERNAME_CHANGE_COOLDOWN");
    assert!(body.error.details.is_some());
}

#[tokio::test]
async fn test_delete_account() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.register("leaver").await.unwrap();
    let credentials = alice.credentials.clone().unwrap();

    let response = alice
        .delete_with("/api/user", &json!({ "password": "WrongPass123" }))
        .await
        .unwrap();
    let body = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body.error.code, "INCORRECT_PASSWORD");

    let response = alice
        .delete_with("/api/user", &json!({ "password": TEST_PASSWORD }))
        .await
        .unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = server.anonymous().post("/api/login", &credentials).await.unwrap();
    assert_status(response, StatusCode::UNAUTHORIZED).await.unwrap();
}

// ============================================================================
// Moderation Tests
// ============================================================================

#[tokio::test]
async fn test_regular_user_cannot_moderate() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    // Registered first so neither of the others can be the owner account
    let _first = server.register("first").await.unwrap();
    let bob = server.register("bob").await.unwrap();
    let carol = server.register("carol").await.unwrap();

    let response = bob
        .post(
            &format!("/api/users/{}/mute", carol.id()),
            &json!({ "duration_minutes": 60, "reason": "spam" }),
        )
        .await
        .unwrap();
    let body = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body.error.code, "INSUFFICIENT_ROLE");

    let response = bob
        .patch(&format!("/api/users/{}/role", carol.id()), &json!({ "role": "admin" }))
        .await
        .unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();
}

// ============================================================================
// Room Tests
// ============================================================================

#[tokio::test]
async fn test_private_room_invite_flow() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let _first = server.register("first").await.unwrap();
    let alice = server.register("alice").await.unwrap();
    let bob = server.register("bob").await.unwrap();

    let response = alice.post("/api/rooms", &CreateRoomRequest::private()).await.unwrap();
    let room: RoomResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    let code = room.invite_code.clone().expect("private room has a code");
    assert!(!room.is_public);
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit()));

    // Hidden from non-members
    let response = bob.get(&format!("/api/rooms/{}", room.id)).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();

    let join = format!("/api/rooms/{}/join", room.id);
    let response = bob.post_empty(&join).await.unwrap();
    let body = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body.error.code, "INVITE_CODE_REQUIRED");

    let wrong: String = code
        .chars()
        .map(|c| if c == '9' { '0' } else { char::from(c as u8 + 1) })
        .collect();
    let response = bob.post(&join, &json!({ "invite_code": wrong })).await.unwrap();
    let body = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body.error.code, "INVALID_INVITE_CODE");

    let response = bob.post(&join, &json!({ "invite_code": code })).await.unwrap();
    let joined: RoomResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(joined.member_count, 2);
    assert!(joined.is_member);

    let response = bob.get(&format!("/api/rooms/{}/members", room.id)).await.unwrap();
    let members: Vec<UserResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(members.len(), 2);
}

#[tokio::test]
async fn test_room_management_requires_creator() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let _first = server.register("first").await.unwrap();
    let alice = server.register("alice").await.unwrap();
    let bob = server.register("bob").await.unwrap();

    let response = alice.post("/api/rooms", &CreateRoomRequest::public()).await.unwrap();
    let room: RoomResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(room.creator_id.as_deref(), Some(alice.id()));
    assert!(room.invite_code.is_none());

    let path = format!("/api/rooms/{}", room.id);
    let response = bob.patch(&path, &json!({ "name": "hijacked" })).await.unwrap();
    let body = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body.error.code, "NOT_ROOM_MANAGER");

    let response = alice.patch(&path, &json!({ "name": "renamed" })).await.unwrap();
    let renamed: RoomResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(renamed.name, "renamed");

    let response = alice.delete(&path).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = alice.get(&path).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_last_member_leaving_deletes_room() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.register("solo").await.unwrap();

    let response = alice.post("/api/rooms", &CreateRoomRequest::public()).await.unwrap();
    let room: RoomResponse = assert_json(response, StatusCode::CREATED).await.unwrap();

    let response = alice
        .post_empty(&format!("/api/rooms/{}/leave", room.id))
        .await
        .unwrap();
    let left: LeaveRoomResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(left.room_deleted);

    let response = alice.get(&format!("/api/rooms/{}", room.id)).await.unwrap();
    let body = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(body.error.code, "UNKNOWN_ROOM");
}

// ============================================================================
// Message Tests
// ============================================================================

#[tokio::test]
async fn test_post_auto_joins_public_room_and_filters_content() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.register("alice").await.unwrap();
    let bob = server.register("bob").await.unwrap();

    let response = alice.post("/api/rooms", &CreateRoomRequest::public()).await.unwrap();
    let room: RoomResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    let messages = format!("/api/rooms/{}/messages", room.id);

    let response = bob.post(&messages, &json!({ "content": "you are a fuck" })).await.unwrap();
    let message: MessageResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(message.content.as_deref(), Some("you are a ####"));
    assert_eq!(message.author.id, bob.id());

    let response = bob.get(&format!("/api/rooms/{}", room.id)).await.unwrap();
    let room: RoomResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(room.is_member);
    assert_eq!(room.member_count, 2);

    let response = bob.post(&messages, &json!({ "content": "a".repeat(101) })).await.unwrap();
    let body = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "CONTENT_TOO_LONG");

    let response = bob.post(&messages, &json!({ "content": "   " })).await.unwrap();
    let body = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "EMPTY_MESSAGE");

    let response = alice.get(&messages).await.unwrap();
    let listed: Vec<MessageResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, message.id);
}

#[tokio::test]
async fn test_message_pagination_newest_first() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.register("pager").await.unwrap();

    let response = alice.post("/api/rooms", &CreateRoomRequest::public()).await.unwrap();
    let room: RoomResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    let messages = format!("/api/rooms/{}/messages", room.id);

    let mut ids = Vec::new();
    for i in 0..5 {
        let response = alice.post(&messages, &json!({ "content": format!("message {i}") })).await.unwrap();
        let message: MessageResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
        ids.push(message.id);
    }

    let response = alice.get(&format!("{messages}?limit=2")).await.unwrap();
    let page: Vec<MessageResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(), [ids[4].as_str(), ids[3].as_str()]);

    let response = alice
        .get(&format!("{messages}?limit=2&before={}", ids[3]))
        .await
        .unwrap();
    let page: Vec<MessageResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.iter().map(|m| m.id.as_str()).collect::<Vec<_>>(), [ids[2].as_str(), ids[1].as_str()]);

    let response = alice.get(&format!("{messages}?limit=500")).await.unwrap();
    let page: Vec<MessageResponse> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(page.len(), 5);

    let response = alice.get(&format!("{messages}?before=soon")).await.unwrap();
    let body = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "INVALID_QUERY_PARAMETER");
}

#[tokio::test]
async fn test_whisper_visible_to_sender_and_target_only() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.register("alice").await.unwrap();
    let bob = server.register("bob").await.unwrap();
    let carol = server.register("carol").await.unwrap();

    let response = alice.post("/api/rooms", &CreateRoomRequest::public()).await.unwrap();
    let room: RoomResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    let messages = format!("/api/rooms/{}/messages", room.id);
    for user in [&bob, &carol] {
        let response = user.post_empty(&format!("/api/rooms/{}/join", room.id)).await.unwrap();
        assert_status(response, StatusCode::OK).await.unwrap();
    }

    let whisper = json!({ "content": format!("/whisper \"{}\" psst", bob.username()) });
    let response = alice.post(&messages, &whisper).await.unwrap();
    let sent: MessageResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(sent.content.as_deref(), Some("psst"));
    assert_eq!(sent.whisper_to.as_ref().map(|u| u.id.as_str()), Some(bob.id()));

    for (viewer, expected) in [(&alice, 1), (&bob, 1), (&carol, 0)] {
        let response = viewer.get(&messages).await.unwrap();
        let listed: Vec<MessageResponse> = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(listed.len(), expected, "viewer {}", viewer.username());
    }
}

#[tokio::test]
async fn test_edit_and_delete_permissions() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let _first = server.register("first").await.unwrap();
    let alice = server.register("alice").await.unwrap();
    let bob = server.register("bob").await.unwrap();

    let response = alice.post("/api/rooms", &CreateRoomRequest::public()).await.unwrap();
    let room: RoomResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    let response = alice
        .post(&format!("/api/rooms/{}/messages", room.id), &json!({ "content": "original" }))
        .await
        .unwrap();
    let message: MessageResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    let path = format!("/api/messages/{}", message.id);

    let response = bob.patch(&path, &json!({ "content": "tampered" })).await.unwrap();
    let body = assert_error(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(body.error.code, "NOT_MESSAGE_AUTHOR");

    let response = bob.delete(&path).await.unwrap();
    assert_status(response, StatusCode::FORBIDDEN).await.unwrap();

    let response = alice.patch(&path, &json!({ "content": "edited" })).await.unwrap();
    let edited: MessageResponse = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(edited.content.as_deref(), Some("edited"));
    assert!(edited.edited);

    let response = alice.delete(&path).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = alice.delete(&path).await.unwrap();
    let body = assert_error(response, StatusCode::NOT_FOUND).await.unwrap();
    assert_eq!(body.error.code, "UNKNOWN_MESSAGE");
}

// ============================================================================
// Mention Tests
// ============================================================================

#[tokio::test]
async fn test_mentions_are_unread_until_room_is_read() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.register("alice").await.unwrap();
    let bob = server.register("bob").await.unwrap();

    let response = alice.post("/api/rooms", &CreateRoomRequest::public()).await.unwrap();
    let room: RoomResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    let response = bob.post_empty(&format!("/api/rooms/{}/join", room.id)).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let messages = format!("/api/rooms/{}/messages", room.id);
    let content = json!({ "content": format!("hey @{}", bob.username()) });
    let response = alice.post(&messages, &content).await.unwrap();
    let message: MessageResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert_eq!(message.mentions, [bob.username().to_string()]);

    let response = bob.get("/api/mentions/unread").await.unwrap();
    let unread: Vec<MentionSummary> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].room_id, room.id);
    assert_eq!(unread[0].count, 1);
    assert_eq!(unread[0].latest_message_id, message.id);

    let response = bob.get(&messages).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = bob.get("/api/mentions/unread").await.unwrap();
    let unread: Vec<MentionSummary> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(unread.is_empty());
}

// ============================================================================
// Typing Tests
// ============================================================================

#[tokio::test]
async fn test_typing_indicator() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.register("alice").await.unwrap();
    let bob = server.register("bob").await.unwrap();

    let response = alice.post("/api/rooms", &CreateRoomRequest::public()).await.unwrap();
    let room: RoomResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    let response = bob.post_empty(&format!("/api/rooms/{}/join", room.id)).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let typing = format!("/api/rooms/{}/typing", room.id);
    let response = bob.post(&typing, &json!({ "typing": true })).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();

    let response = alice.get(&typing).await.unwrap();
    let typists: Vec<TypingUser> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(typists.len(), 1);
    assert_eq!(typists[0].user_id, bob.id());

    // The typist does not see themself
    let response = bob.get(&typing).await.unwrap();
    let typists: Vec<TypingUser> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(typists.is_empty());

    let response = bob.post(&typing, &json!({ "typing": false })).await.unwrap();
    assert_status(response, StatusCode::NO_CONTENT).await.unwrap();
    let response = alice.get(&typing).await.unwrap();
    let typists: Vec<TypingUser> = assert_json(response, StatusCode::OK).await.unwrap();
    assert!(typists.is_empty());
}

// ============================================================================
// Upload Tests
// ============================================================================

#[tokio::test]
async fn test_upload_and_serve_media() {
    if !check_test_env().await {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let alice = server.register("uploader").await.unwrap();
    let bytes = b"\x89PNG\r\n\x1a\nfake-image".to_vec();

    let response = alice
        .client
        .post(format!("{}/api/upload", server.base_url()))
        .header("content-type", "image/png")
        .body(bytes.clone())
        .send()
        .await
        .unwrap();
    let upload: UploadResponse = assert_json(response, StatusCode::CREATED).await.unwrap();
    assert!(upload.url.starts_with("/uploads/"));
    assert!(upload.url.ends_with(".png"));
    assert_eq!(upload.media_type, "image");
    assert_eq!(upload.size, bytes.len());

    let response = alice.get(&upload.url).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.bytes().await.unwrap().to_vec(), bytes);

    let response = alice
        .client
        .post(format!("{}/api/upload", server.base_url()))
        .header("content-type", "text/plain")
        .body("hello")
        .send()
        .await
        .unwrap();
    let body = assert_error(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(body.error.code, "INVALID_MEDIA_TYPE");
}
