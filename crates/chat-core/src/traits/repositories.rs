//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs; `chat-db` provides the PostgreSQL
//! implementation and the service tests provide in-memory ones.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{
    Message, MentionSummary, Mute, Role, Room, RoomMember, Session, Suspension, UnreadMention, User,
};
use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

/// Self-service profile change; `None` leaves the column as it is
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub appear_offline: Option<bool>,
    /// `Some(None)` clears the avatar
    pub avatar: Option<Option<String>>,
}

/// Writes touch only the columns they name and return the stored row, so a
/// profile edit never undoes a concurrent mute or role change.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find user by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>>;

    /// Find user by username (case-insensitive)
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// List users ordered by username
    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<User>>;

    /// Create a new user; fails with `UsernameTaken` on a duplicate name.
    /// The first account ever stored becomes `Owner` whatever `user.role`
    /// says, decided atomically with the insert. Returns the stored row.
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<User>;

    /// Apply a profile change
    async fn set_profile(&self, id: Snowflake, update: &ProfileUpdate) -> RepoResult<User>;

    /// Rename and record when; fails with `UsernameTaken` on a duplicate name
    async fn set_username(
        &self,
        id: Snowflake,
        username: &str,
        changed_at: DateTime<Utc>,
    ) -> RepoResult<User>;

    async fn set_mute(&self, id: Snowflake, mute: &Mute) -> RepoResult<User>;

    async fn clear_mute(&self, id: Snowflake) -> RepoResult<User>;

    /// Set or lift a suspension; setting one also marks the user offline
    async fn set_suspension(
        &self,
        id: Snowflake,
        suspension: Option<&Suspension>,
    ) -> RepoResult<User>;

    async fn set_role(&self, id: Snowflake, role: Role) -> RepoResult<User>;

    /// Set only the online flag
    async fn set_online(&self, id: Snowflake, online: bool) -> RepoResult<()>;

    /// Get password hash for authentication
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>>;

    /// Update password hash
    async fn update_password(&self, id: Snowflake, password_hash: &str) -> RepoResult<()>;

    /// Hard delete; memberships, messages, sessions and mentions cascade
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Room Repository
// ============================================================================

#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// Find room by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Room>>;

    /// Public rooms plus private rooms the user belongs to
    async fn find_visible(&self, user_id: Snowflake) -> RepoResult<Vec<Room>>;

    /// Create a room; fails with `InviteCodeExists` on a code collision
    async fn create(&self, room: &Room) -> RepoResult<()>;

    /// Persist name and invite code
    async fn update(&self, room: &Room) -> RepoResult<()>;

    /// Delete a room with its memberships, messages and mentions
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;

    /// Delete the room only if it has no members left, in one statement.
    /// Returns whether the room was deleted.
    async fn delete_if_empty(&self, id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Member Repository
// ============================================================================

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Find a membership
    async fn find(&self, room_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<RoomMember>>;

    /// Check membership
    async fn is_member(&self, room_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;

    /// Add a membership; returns false if it already existed
    async fn add(&self, member: &RoomMember) -> RepoResult<bool>;

    /// Remove a membership; returns false if there was none
    async fn remove(&self, room_id: Snowflake, user_id: Snowflake) -> RepoResult<bool>;

    /// Number of members in a room
    async fn count(&self, room_id: Snowflake) -> RepoResult<i64>;

    /// Users in a room, ordered by join time
    async fn list_users(&self, room_id: Snowflake) -> RepoResult<Vec<User>>;

    /// IDs of rooms the user belongs to
    async fn rooms_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<Snowflake>>;
}

// ============================================================================
// Message Repository
// ============================================================================

/// Cursor query over a room's messages
#[derive(Debug, Clone, Default)]
pub struct MessageQuery {
    pub before: Option<Snowflake>,
    pub after: Option<Snowflake>,
    pub limit: i64,
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Find message by ID
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>>;

    /// Messages the viewer may see, newest first. Whispers not sent by or
    /// addressed to the viewer are excluded by the query itself.
    async fn find_visible(
        &self,
        room_id: Snowflake,
        viewer_id: Snowflake,
        query: MessageQuery,
    ) -> RepoResult<Vec<Message>>;

    /// Create a new message
    async fn create(&self, message: &Message) -> RepoResult<()>;

    /// Persist an edit (content and edited_at)
    async fn update(&self, message: &Message) -> RepoResult<()>;

    /// Delete a message and its unread mentions
    async fn delete(&self, id: Snowflake) -> RepoResult<()>;
}

// ============================================================================
// Mention Repository
// ============================================================================

#[async_trait]
pub trait MentionRepository: Send + Sync {
    /// Record unread mentions, ignoring duplicates. Returns rows inserted.
    async fn create_many(&self, mentions: &[UnreadMention]) -> RepoResult<u64>;

    /// Per-room unread counts for a user
    async fn unread_summary(&self, user_id: Snowflake) -> RepoResult<Vec<MentionSummary>>;

    /// Clear a user's unread mentions in one room
    async fn clear_room(&self, user_id: Snowflake, room_id: Snowflake) -> RepoResult<u64>;
}

// ============================================================================
// Session Repository
// ============================================================================

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &Session) -> RepoResult<()>;

    async fn find(&self, id: &str) -> RepoResult<Option<Session>>;

    async fn delete(&self, id: &str) -> RepoResult<()>;

    /// Revoke every session of a user (logout everywhere, suspension)
    async fn delete_for_user(&self, user_id: Snowflake) -> RepoResult<u64>;

    /// Purge sessions that expired before `now`
    async fn delete_expired(&self, now: DateTime<Utc>) -> RepoResult<u64>;
}
