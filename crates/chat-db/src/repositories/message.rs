//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use chat_core::entities::Message;
use chat_core::traits::{MessageQuery, MessageRepository, RepoResult};
use chat_core::value_objects::Snowflake;

use crate::mappers::MessageInsert;
use crate::models::MessageModel;

use super::error::{map_db_error, message_not_found};

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Message>> {
        let result = sqlx::query_as::<_, MessageModel>(
            r"
            SELECT id, room_id, author_id, content, media_url, media_type, whisper_to,
                   mentions, created_at, edited_at
            FROM messages
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Message::from))
    }

    #[instrument(skip(self))]
    async fn find_visible(
        &self,
        room_id: Snowflake,
        viewer_id: Snowflake,
        query: MessageQuery,
    ) -> RepoResult<Vec<Message>> {
        let limit = query.limit.clamp(1, 100);

        let results = match (query.before, query.after) {
            (Some(before), _) => {
                // Older page (scrolling up)
                sqlx::query_as::<_, MessageModel>(
                    r"
                    SELECT id, room_id, author_id, content, media_url, media_type, whisper_to,
                           mentions, created_at, edited_at
                    FROM messages
                    WHERE room_id = $1
                      AND (whisper_to IS NULL OR author_id = $2 OR whisper_to = $2)
                      AND id < $3
                    ORDER BY id DESC
                    LIMIT $4
                    ",
                )
                .bind(room_id.into_inner())
                .bind(viewer_id.into_inner())
                .bind(before.into_inner())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
            (None, Some(after)) => {
                // Newer page (catching up); nearest rows first, flipped below
                sqlx::query_as::<_, MessageModel>(
                    r"
                    SELECT id, room_id, author_id, content, media_url, media_type, whisper_to,
                           mentions, created_at, edited_at
                    FROM messages
                    WHERE room_id = $1
                      AND (whisper_to IS NULL OR author_id = $2 OR whisper_to = $2)
                      AND id > $3
                    ORDER BY id ASC
                    LIMIT $4
                    ",
                )
                .bind(room_id.into_inner())
                .bind(viewer_id.into_inner())
                .bind(after.into_inner())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
                .map(|mut rows| {
                    rows.reverse();
                    rows
                })
            }
            (None, None) => {
                sqlx::query_as::<_, MessageModel>(
                    r"
                    SELECT id, room_id, author_id, content, media_url, media_type, whisper_to,
                           mentions, created_at, edited_at
                    FROM messages
                    WHERE room_id = $1
                      AND (whisper_to IS NULL OR author_id = $2 OR whisper_to = $2)
                    ORDER BY id DESC
                    LIMIT $3
                    ",
                )
                .bind(room_id.into_inner())
                .bind(viewer_id.into_inner())
                .bind(limit)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Message::from).collect())
    }

    #[instrument(skip(self))]
    async fn create(&self, message: &Message) -> RepoResult<()> {
        let row = MessageInsert::new(message);

        sqlx::query(
            r"
            INSERT INTO messages (id, room_id, author_id, content, media_url, media_type,
                                  whisper_to, mentions, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ",
        )
        .bind(row.id)
        .bind(row.room_id)
        .bind(row.author_id)
        .bind(row.content)
        .bind(row.media_url)
        .bind(row.media_type)
        .bind(row.whisper_to)
        .bind(row.mentions)
        .bind(message.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update(&self, message: &Message) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE messages
            SET content = $2, mentions = $3, edited_at = $4
            WHERE id = $1
            ",
        )
        .bind(message.id.into_inner())
        .bind(&message.content)
        .bind(&message.mentions)
        .bind(message.edited_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(message_not_found(message.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(message_not_found(id));
        }

        Ok(())
    }
}
