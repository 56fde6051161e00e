//! Session and mention summary mappers

use chat_core::entities::{MentionSummary, Session};
use chat_core::value_objects::Snowflake;

use crate::models::{MentionSummaryModel, SessionModel};

impl From<SessionModel> for Session {
    fn from(model: SessionModel) -> Self {
        Session {
            id: model.id,
            user_id: Snowflake::new(model.user_id),
            created_at: model.created_at,
            expires_at: model.expires_at,
        }
    }
}

impl From<MentionSummaryModel> for MentionSummary {
    fn from(model: MentionSummaryModel) -> Self {
        MentionSummary {
            room_id: Snowflake::new(model.room_id),
            room_name: model.room_name,
            count: model.count,
            latest_message_id: Snowflake::new(model.latest_message_id),
        }
    }
}
