//! Unread mention aggregate row

use sqlx::FromRow;

/// One row of the per-room unread mention summary
#[derive(Debug, Clone, FromRow)]
pub struct MentionSummaryModel {
    pub room_id: i64,
    pub room_name: String,
    pub count: i64,
    pub latest_message_id: i64,
}
