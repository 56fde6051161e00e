//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.
//! Validation here is shape-only; domain rules (reserved usernames, password
//! strength, the 100-character message cap after command expansion) are
//! enforced by the services.

use serde::Deserialize;
use validator::Validate;

// ============================================================================
// Auth Requests
// ============================================================================

/// User registration request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 32, message = "Username must be 2-32 characters"))]
    pub username: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

/// User login request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

// ============================================================================
// User Requests
// ============================================================================

/// Profile update; omitted fields are left alone and an empty avatar clears it
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    pub appear_offline: Option<bool>,

    #[validate(length(max = 512, message = "Avatar must be at most 512 characters"))]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangeUsernameRequest {
    #[validate(length(min = 2, max = 32, message = "Username must be 2-32 characters"))]
    pub new_username: String,

    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub new_password: String,
}

/// Account deletion, confirmed with the password
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DeleteAccountRequest {
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

// ============================================================================
// Moderation Requests
// ============================================================================

/// One year, in minutes
pub const MAX_MUTE_MINUTES: i64 = 525_600;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MuteRequest {
    #[validate(range(min = 1, max = 525_600, message = "Duration must be 1-525600 minutes"))]
    pub duration_minutes: i64,

    #[validate(length(min = 1, max = 512, message = "Reason must be 1-512 characters"))]
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SuspendRequest {
    #[validate(length(min = 1, max = 512, message = "Reason must be 1-512 characters"))]
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ChangeRoleRequest {
    #[validate(length(min = 1, max = 16, message = "Role is required"))]
    pub role: String,
}

// ============================================================================
// Room Requests
// ============================================================================

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, max = 50, message = "Room name must be 1-50 characters"))]
    pub name: String,

    #[serde(default = "default_true")]
    pub is_public: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRoomRequest {
    #[validate(length(min = 1, max = 50, message = "Room name must be 1-50 characters"))]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct JoinRoomRequest {
    #[validate(length(max = 16, message = "Invite code is too long"))]
    pub invite_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TypingRequest {
    pub typing: bool,
}

// ============================================================================
// Message Requests
// ============================================================================

/// Media attached to a message, usually the `url` returned by an upload
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MediaRequest {
    #[validate(length(min = 1, max = 2048, message = "Media URL must be 1-2048 characters"))]
    pub url: String,

    /// `image` or `video`
    pub media_type: String,
}

/// Raw message as typed; slash commands are expanded server-side
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateMessageRequest {
    #[validate(length(max = 2000, message = "Message must be at most 2000 characters"))]
    pub content: Option<String>,

    #[validate(nested)]
    pub media: Option<MediaRequest>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateMessageRequest {
    #[validate(length(min = 1, max = 2000, message = "Message must be 1-2000 characters"))]
    pub content: String,
}

/// Extra mention notifications for an existing message
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddMentionsRequest {
    #[validate(length(min = 1, max = 50, message = "Provide 1-50 usernames"))]
    pub usernames: Vec<String>,
}
