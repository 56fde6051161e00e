//! Test fixtures and data generators
//!
//! Provides reusable request bodies and the response shapes the tests read.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Password that passes the strength rules
pub const TEST_PASSWORD: &str = "TestPass123";

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Username unique across test runs against the same database
pub fn unique_username(prefix: &str) -> String {
    let run = uuid::Uuid::new_v4().simple().to_string();
    format!("{prefix}_{}{}", &run[..10], unique_suffix())
}

/// Registration and login body
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn unique(prefix: &str) -> Self {
        Self {
            username: unique_username(prefix),
            password: TEST_PASSWORD.to_string(),
        }
    }
}

/// Auth response
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    pub user: CurrentUser,
}

/// Full profile of the caller
#[derive(Debug, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub role: String,
    pub online: bool,
    pub appear_offline: bool,
    pub avatar: Option<String>,
}

/// Public user response
#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub role: String,
    pub online: bool,
    pub muted_until: Option<String>,
    pub suspended: bool,
}

#[derive(Debug, Serialize)]
pub struct CreateRoomRequest {
    pub name: String,
    pub is_public: bool,
}

impl CreateRoomRequest {
    pub fn public() -> Self {
        Self {
            name: format!("Public Room {}", unique_suffix()),
            is_public: true,
        }
    }

    pub fn private() -> Self {
        Self {
            name: format!("Private Room {}", unique_suffix()),
            is_public: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RoomResponse {
    pub id: String,
    pub name: String,
    pub is_public: bool,
    pub creator_id: Option<String>,
    pub invite_code: Option<String>,
    pub member_count: i64,
    pub is_member: bool,
}

#[derive(Debug, Deserialize)]
pub struct LeaveRoomResponse {
    pub room_deleted: bool,
}

#[derive(Debug, Deserialize)]
pub struct UserRef {
    pub id: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub id: String,
    pub room_id: String,
    pub author: UserRef,
    pub content: Option<String>,
    pub whisper_to: Option<UserRef>,
    pub mentions: Vec<String>,
    pub edited: bool,
}

#[derive(Debug, Deserialize)]
pub struct MentionSummary {
    pub room_id: String,
    pub room_name: String,
    pub count: i64,
    pub latest_message_id: String,
}

#[derive(Debug, Deserialize)]
pub struct TypingUser {
    pub user_id: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub url: String,
    pub media_type: String,
    pub size: usize,
}

/// `{"error": {...}}` envelope
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub reason: Option<String>,
    pub details: Option<serde_json::Value>,
}
