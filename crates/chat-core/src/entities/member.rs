//! Member entity - a user's membership in a room

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Room membership (junction between User and Room), unique per pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomMember {
    pub room_id: Snowflake,
    pub user_id: Snowflake,
    pub joined_at: DateTime<Utc>,
}

impl RoomMember {
    pub fn new(room_id: Snowflake, user_id: Snowflake) -> Self {
        Self {
            room_id,
            user_id,
            joined_at: Utc::now(),
        }
    }
}
