//! # chat-core
//!
//! Domain layer for the room chat: users and their role hierarchy, rooms with invite codes,
//! messages, unread mentions, sessions, and the content pipeline (slash commands, profanity
//! filter, mention extraction). This crate has zero dependencies on infrastructure.

pub mod content;
pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use content::{
    expand_commands, extract_mentions, resolve_mentions, CommandOutput, MentionTarget,
    ProfanityFilter,
};
pub use entities::{
    validate_message_body, validate_room_name, validate_username, Media, MediaType,
    MentionSummary, Message, Mute, Role, Room, RoomMember, Session, Suspension, UnreadMention,
    User, MAX_CONTENT_CHARS, USERNAME_CHANGE_COOLDOWN_DAYS,
};
pub use error::DomainError;
pub use traits::{
    MemberRepository, MentionRepository, MessageQuery, MessageRepository, ProfileUpdate,
    RepoResult, RoomRepository, SessionRepository, UserRepository,
};
pub use value_objects::{
    generate_invite_code, is_valid_invite_code, Snowflake, SnowflakeGenerator,
    SnowflakeParseError, INVITE_CODE_LEN,
};
