//! Database models - SQLx-compatible structs for PostgreSQL tables

mod member;
mod mention;
mod message;
mod room;
mod session;
mod user;

pub use member::RoomMemberModel;
pub use mention::MentionSummaryModel;
pub use message::MessageModel;
pub use room::RoomModel;
pub use session::SessionModel;
pub use user::UserModel;
