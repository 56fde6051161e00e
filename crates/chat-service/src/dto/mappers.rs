//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use chat_core::entities::{MentionSummary, Message, Room, User};

use super::responses::{
    CurrentUserResponse, MentionSummaryResponse, MessageResponse, RoomResponse, UserRef,
    UserResponse,
};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            role: user.role,
            avatar: user.avatar.clone(),
            online: user.visible_online(),
            muted_until: user.mute.as_ref().map(|m| m.until),
            suspended: user.is_suspended(),
            created_at: user.created_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

impl From<&User> for CurrentUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            role: user.role,
            avatar: user.avatar.clone(),
            online: user.online,
            appear_offline: user.appear_offline,
            muted_until: user.mute.as_ref().map(|m| m.until),
            muted_reason: user.mute.as_ref().map(|m| m.reason.clone()),
            last_username_change: user.last_username_change,
            next_username_change_at: user.next_username_change_at(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for CurrentUserResponse {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

impl From<&User> for UserRef {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
        }
    }
}

// ============================================================================
// Room Mappers
// ============================================================================

/// Room with per-viewer metadata for response mapping
pub struct RoomWithMeta {
    pub room: Room,
    pub member_count: i64,
    pub is_member: bool,
    /// Whether the viewer may see the invite code
    pub show_code: bool,
}

impl From<RoomWithMeta> for RoomResponse {
    fn from(data: RoomWithMeta) -> Self {
        let is_public = data.room.is_public();
        Self {
            id: data.room.id.to_string(),
            name: data.room.name,
            is_public,
            creator_id: data.room.creator_id.map(|id| id.to_string()),
            invite_code: data.room.invite_code.filter(|_| data.show_code),
            member_count: data.member_count,
            is_member: data.is_member,
            created_at: data.room.created_at,
            updated_at: data.room.updated_at,
        }
    }
}

// ============================================================================
// Message Mappers
// ============================================================================

/// Message with resolved author and whisper target
pub struct MessageWithDetails {
    pub message: Message,
    pub author: UserRef,
    pub whisper_to: Option<UserRef>,
}

impl From<MessageWithDetails> for MessageResponse {
    fn from(data: MessageWithDetails) -> Self {
        let message = data.message;
        Self {
            id: message.id.to_string(),
            room_id: message.room_id.to_string(),
            edited: message.is_edited(),
            author: data.author,
            content: message.content,
            media: message.media,
            whisper_to: data.whisper_to,
            mentions: message.mentions,
            created_at: message.created_at,
            edited_at: message.edited_at,
        }
    }
}

impl From<MentionSummary> for MentionSummaryResponse {
    fn from(summary: MentionSummary) -> Self {
        Self {
            room_id: summary.room_id.to_string(),
            room_name: summary.room_name,
            count: summary.count,
            latest_message_id: summary.latest_message_id.to_string(),
        }
    }
}
