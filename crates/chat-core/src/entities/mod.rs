//! Domain entities - core business objects

mod member;
mod mention;
mod message;
mod role;
mod room;
mod session;
mod user;

pub use member::RoomMember;
pub use mention::{MentionSummary, UnreadMention};
pub use message::{validate_message_body, Media, MediaType, Message, MAX_CONTENT_CHARS};
pub use role::Role;
pub use room::{validate_room_name, Room, ROOM_NAME_MAX};
pub use session::Session;
pub use user::{
    validate_username, Mute, Suspension, User, USERNAME_CHANGE_COOLDOWN_DAYS,
};
