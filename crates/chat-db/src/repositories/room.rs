//! PostgreSQL implementation of RoomRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use chat_core::entities::Room;
use chat_core::error::DomainError;
use chat_core::traits::{RepoResult, RoomRepository};
use chat_core::value_objects::Snowflake;

use crate::models::RoomModel;

use super::error::{map_db_error, map_unique_violation, room_not_found};

/// PostgreSQL implementation of RoomRepository
#[derive(Clone)]
pub struct PgRoomRepository {
    pool: PgPool,
}

impl PgRoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomRepository for PgRoomRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<Room>> {
        let result = sqlx::query_as::<_, RoomModel>(
            r"
            SELECT id, name, creator_id, is_public, invite_code, created_at, updated_at
            FROM rooms
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Room::from))
    }

    #[instrument(skip(self))]
    async fn find_visible(&self, user_id: Snowflake) -> RepoResult<Vec<Room>> {
        let results = sqlx::query_as::<_, RoomModel>(
            r"
            SELECT r.id, r.name, r.creator_id, r.is_public, r.invite_code, r.created_at, r.updated_at
            FROM rooms r
            WHERE r.is_public
               OR EXISTS (
                   SELECT 1 FROM room_members m
                   WHERE m.room_id = r.id AND m.user_id = $1
               )
            ORDER BY LOWER(r.name), r.id
            ",
        )
        .bind(user_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Room::from).collect())
    }

    #[instrument(skip(self))]
    async fn create(&self, room: &Room) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO rooms (id, name, creator_id, is_public, invite_code, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(room.id.into_inner())
        .bind(&room.name)
        .bind(room.creator_id.map(Snowflake::into_inner))
        .bind(room.is_public())
        .bind(&room.invite_code)
        .bind(room.created_at)
        .bind(room.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::InviteCodeExists))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update(&self, room: &Room) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE rooms
            SET name = $2, invite_code = $3, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(room.id.into_inner())
        .bind(&room.name)
        .bind(&room.invite_code)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::InviteCodeExists))?;

        if result.rows_affected() == 0 {
            return Err(room_not_found(room.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(room_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_if_empty(&self, id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM rooms r
            WHERE r.id = $1
              AND NOT EXISTS (SELECT 1 FROM room_members m WHERE m.room_id = r.id)
            ",
        )
        .bind(id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
