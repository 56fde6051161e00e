//! Room and membership entity <-> model mappers

use chat_core::entities::{Room, RoomMember};
use chat_core::value_objects::Snowflake;

use crate::models::{RoomMemberModel, RoomModel};

/// Convert RoomModel to Room entity. Visibility is carried by the invite
/// code; `is_public` is only stored for the table CHECK.
impl From<RoomModel> for Room {
    fn from(model: RoomModel) -> Self {
        Room {
            id: Snowflake::new(model.id),
            name: model.name,
            creator_id: model.creator_id.map(Snowflake::new),
            invite_code: model.invite_code.map(|c| c.trim().to_string()),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<RoomMemberModel> for RoomMember {
    fn from(model: RoomMemberModel) -> Self {
        RoomMember {
            room_id: Snowflake::new(model.room_id),
            user_id: Snowflake::new(model.user_id),
            joined_at: model.joined_at,
        }
    }
}
