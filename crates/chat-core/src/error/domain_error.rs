//! Domain errors - error types for the domain layer

use chrono::{DateTime, Utc};
use serde_json::json;
use thiserror::Error;

use crate::entities::Role;
use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    #[error("User not found: {0}")]
    UsernameNotFound(String),

    #[error("Room not found: {0}")]
    RoomNotFound(Snowflake),

    #[error("Message not found: {0}")]
    MessageNotFound(Snowflake),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Invalid room name: {0}")]
    InvalidRoomName(String),

    #[error("Content too long: max {max} characters")]
    ContentTooLong { max: usize },

    #[error("Message must have content or media")]
    EmptyMessage,

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    #[error("Invalid media type: {0}")]
    InvalidMediaType(String),

    #[error("Invalid whisper: {0}")]
    InvalidWhisper(String),

    #[error("Username can be changed again at {next_allowed_at}")]
    UsernameChangeCooldown { next_allowed_at: DateTime<Utc> },

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Requires role {required} or above")]
    InsufficientRole { required: Role },

    #[error("Only the room creator or an admin can manage this room")]
    NotRoomManager,

    #[error("Not message author")]
    NotMessageAuthor,

    #[error("Not a member of this room")]
    NotRoomMember,

    #[error("Invite code required to join this room")]
    InviteCodeRequired,

    #[error("Invalid invite code")]
    InvalidInviteCode,

    #[error("You are muted until {until}: {reason}")]
    UserMuted { reason: String, until: DateTime<Utc> },

    #[error("Account suspended: {reason}")]
    UserSuspended { reason: String },

    #[error("Current password is incorrect")]
    IncorrectPassword,

    #[error("Cannot moderate a user with an equal or higher role")]
    CannotModerateTarget,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Username already taken")]
    UsernameTaken,

    #[error("Invite code already exists")]
    InviteCodeExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) | Self::UsernameNotFound(_) => "UNKNOWN_USER",
            Self::RoomNotFound(_) => "UNKNOWN_ROOM",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",

            // Validation
            Self::ValidationError(_) | Self::InvalidRoomName(_) => "VALIDATION_ERROR",
            Self::InvalidUsername(_) => "INVALID_USERNAME",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::ContentTooLong { .. } => "CONTENT_TOO_LONG",
            Self::EmptyMessage => "EMPTY_MESSAGE",
            Self::InvalidRole(_) => "INVALID_ROLE",
            Self::InvalidMediaType(_) => "INVALID_MEDIA_TYPE",
            Self::InvalidWhisper(_) => "INVALID_WHISPER",
            Self::UsernameChangeCooldown { .. } => "USERNAME_CHANGE_COOLDOWN",

            // Authorization
            Self::InsufficientRole { .. } => "INSUFFICIENT_ROLE",
            Self::NotRoomManager => "NOT_ROOM_MANAGER",
            Self::NotMessageAuthor => "NOT_MESSAGE_AUTHOR",
            Self::NotRoomMember => "NOT_ROOM_MEMBER",
            Self::InviteCodeRequired => "INVITE_CODE_REQUIRED",
            Self::InvalidInviteCode => "INVALID_INVITE_CODE",
            Self::UserMuted { .. } => "USER_MUTED",
            Self::UserSuspended { .. } => "USER_SUSPENDED",
            Self::IncorrectPassword => "INCORRECT_PASSWORD",
            Self::CannotModerateTarget => "CANNOT_MODERATE_USER",

            // Conflict
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::InviteCodeExists => "INVITE_CODE_EXISTS",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Human readable reason attached to mute and suspension rejections
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::UserMuted { reason, .. } | Self::UserSuspended { reason } => Some(reason),
            _ => None,
        }
    }

    /// Structured details for the error body, if any
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Self::UserMuted { reason, until } => Some(json!({
                "reason": reason,
                "muted_until": until,
            })),
            Self::UserSuspended { reason } => Some(json!({ "reason": reason })),
            Self::UsernameChangeCooldown { next_allowed_at } => {
                Some(json!({ "next_allowed_at": next_allowed_at }))
            }
            Self::InsufficientRole { required } => Some(json!({ "required_role": required })),
            Self::ContentTooLong { max } => Some(json!({ "max": max })),
            _ => None,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::UsernameNotFound(_)
                | Self::RoomNotFound(_)
                | Self::MessageNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidUsername(_)
                | Self::WeakPassword(_)
                | Self::InvalidRoomName(_)
                | Self::ContentTooLong { .. }
                | Self::EmptyMessage
                | Self::InvalidRole(_)
                | Self::InvalidMediaType(_)
                | Self::InvalidWhisper(_)
                | Self::UsernameChangeCooldown { .. }
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::InsufficientRole { .. }
                | Self::NotRoomManager
                | Self::NotMessageAuthor
                | Self::NotRoomMember
                | Self::InviteCodeRequired
                | Self::InvalidInviteCode
                | Self::UserMuted { .. }
                | Self::UserSuspended { .. }
                | Self::IncorrectPassword
                | Self::CannotModerateTarget
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::UsernameTaken | Self::InviteCodeExists)
    }
}
