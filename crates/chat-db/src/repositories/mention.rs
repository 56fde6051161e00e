//! PostgreSQL implementation of MentionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use chat_core::entities::{MentionSummary, UnreadMention};
use chat_core::traits::{MentionRepository, RepoResult};
use chat_core::value_objects::Snowflake;

use crate::models::MentionSummaryModel;

use super::error::map_db_error;

/// PostgreSQL implementation of MentionRepository
#[derive(Clone)]
pub struct PgMentionRepository {
    pool: PgPool,
}

impl PgMentionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MentionRepository for PgMentionRepository {
    #[instrument(skip(self, mentions), fields(count = mentions.len()))]
    async fn create_many(&self, mentions: &[UnreadMention]) -> RepoResult<u64> {
        if mentions.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        let mut inserted = 0;

        for mention in mentions {
            let result = sqlx::query(
                r"
                INSERT INTO unread_mentions (user_id, message_id, room_id, created_at)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (user_id, message_id) DO NOTHING
                ",
            )
            .bind(mention.user_id.into_inner())
            .bind(mention.message_id.into_inner())
            .bind(mention.room_id.into_inner())
            .bind(mention.created_at)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

            inserted += result.rows_affected();
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(inserted)
    }

    #[instrument(skip(self))]
    async fn unread_summary(&self, user_id: Snowflake) -> RepoResult<Vec<MentionSummary>> {
        let results = sqlx::query_as::<_, MentionSummaryModel>(
            r"
            SELECT um.room_id, r.name AS room_name,
                   COUNT(*) AS count, MAX(um.message_id) AS latest_message_id
            FROM unread_mentions um
            JOIN rooms r ON r.id = um.room_id
            WHERE um.user_id = $1
            GROUP BY um.room_id, r.name
            ORDER BY latest_message_id DESC
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(MentionSummary::from).collect())
    }

    #[instrument(skip(self))]
    async fn clear_room(&self, user_id: Snowflake, room_id: Snowflake) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM unread_mentions WHERE user_id = $1 AND room_id = $2")
            .bind(user_id.into_inner())
            .bind(room_id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }
}
