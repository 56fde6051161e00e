//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

// Re-export commonly used request types
pub use requests::{
    AddMentionsRequest, ChangePasswordRequest, ChangeRoleRequest, ChangeUsernameRequest,
    CreateMessageRequest, CreateRoomRequest, DeleteAccountRequest, JoinRoomRequest, LoginRequest,
    MediaRequest, MuteRequest, RegisterRequest, SuspendRequest, TypingRequest,
    UpdateMessageRequest, UpdateProfileRequest, UpdateRoomRequest, MAX_MUTE_MINUTES,
};

// Re-export commonly used response types
pub use responses::{
    AuthResponse, CurrentUserResponse, HealthChecks, HealthResponse, LeaveRoomResponse,
    MentionSummaryResponse, MessageResponse, ReadinessResponse, RecordedMentionsResponse,
    RoomResponse, TypingUserResponse, UploadResponse, UserRef, UserResponse,
};

// Re-export mappers and helper structs
pub use mappers::{MessageWithDetails, RoomWithMeta};
