//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in chat-core.
//! Each repository handles database operations for a specific domain entity.

mod error;
mod member;
mod mention;
mod message;
mod room;
mod session;
mod user;

pub use member::PgMemberRepository;
pub use mention::PgMentionRepository;
pub use message::PgMessageRepository;
pub use room::PgRoomRepository;
pub use session::PgSessionRepository;
pub use user::PgUserRepository;
