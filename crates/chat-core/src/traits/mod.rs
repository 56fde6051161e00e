//! Repository traits (ports)

mod repositories;

pub use repositories::{
    MemberRepository, MentionRepository, MessageQuery, MessageRepository, ProfileUpdate,
    RepoResult, RoomRepository, SessionRepository, UserRepository,
};
