//! Unread mention - a pending notification for a mentioned user

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Unique per (user, message)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreadMention {
    pub user_id: Snowflake,
    pub message_id: Snowflake,
    pub room_id: Snowflake,
    pub created_at: DateTime<Utc>,
}

impl UnreadMention {
    pub fn new(user_id: Snowflake, message_id: Snowflake, room_id: Snowflake) -> Self {
        Self {
            user_id,
            message_id,
            room_id,
            created_at: Utc::now(),
        }
    }
}

/// Per-room aggregate of a user's unread mentions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionSummary {
    pub room_id: Snowflake,
    pub room_name: String,
    pub count: i64,
    pub latest_message_id: Snowflake,
}
