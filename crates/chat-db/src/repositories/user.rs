//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use chat_core::entities::{Mute, Role, Suspension, User};
use chat_core::error::DomainError;
use chat_core::traits::{ProfileUpdate, RepoResult, UserRepository};
use chat_core::value_objects::Snowflake;

use crate::models::UserModel;

use super::error::{map_db_error, map_unique_violation, user_not_found};

/// Advisory lock key held while inserting a user
const FIRST_OWNER_LOCK: i64 = 0x6368_6174_6f77_6e72;

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, username, role, avatar, online, appear_offline,
                   muted_until, muted_reason, suspended_at, suspended_reason,
                   last_username_change, created_at, updated_at
            FROM users
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, username, role, avatar, online, appear_offline,
                   muted_until, muted_reason, suspended_at, suspended_reason,
                   last_username_change, created_at, updated_at
            FROM users
            WHERE LOWER(username) = LOWER($1)
            ",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(User::from))
    }

    #[instrument(skip(self))]
    async fn list(&self, limit: i64, offset: i64) -> RepoResult<Vec<User>> {
        let results = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, username, role, avatar, online, appear_offline,
                   muted_until, muted_reason, suspended_at, suspended_reason,
                   last_username_change, created_at, updated_at
            FROM users
            ORDER BY LOWER(username)
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(limit.clamp(1, 200))
        .bind(offset.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(User::from).collect())
    }

    #[instrument(skip(self, password_hash))]
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<User> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Serialises registrations so only one can see an empty table
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(FIRST_OWNER_LOCK)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let created = sqlx::query_as::<_, UserModel>(
            r"
            INSERT INTO users (id, username, password_hash, role, avatar, online, appear_offline,
                               created_at, updated_at)
            SELECT $1, $2, $3,
                   CASE WHEN EXISTS (SELECT 1 FROM users) THEN $4 ELSE 'owner' END,
                   $5, $6, $7, $8, $9
            RETURNING id, username, role, avatar, online, appear_offline,
                      muted_until, muted_reason, suspended_at, suspended_reason,
                      last_username_change, created_at, updated_at
            ",
        )
        .bind(user.id.into_inner())
        .bind(&user.username)
        .bind(password_hash)
        .bind(user.role.as_str())
        .bind(&user.avatar)
        .bind(user.online)
        .bind(user.appear_offline)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::UsernameTaken))?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(User::from(created))
    }

    #[instrument(skip(self))]
    async fn set_profile(&self, id: Snowflake, update: &ProfileUpdate) -> RepoResult<User> {
        let avatar = update.avatar.as_ref();
        let result = sqlx::query_as::<_, UserModel>(
            r"
            UPDATE users
            SET appear_offline = COALESCE($2, appear_offline),
                avatar = CASE WHEN $3 THEN $4 ELSE avatar END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, role, avatar, online, appear_offline,
                      muted_until, muted_reason, suspended_at, suspended_reason,
                      last_username_change, created_at, updated_at
            ",
        )
        .bind(id.into_inner())
        .bind(update.appear_offline)
        .bind(avatar.is_some())
        .bind(avatar.and_then(|a| a.as_deref()))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(User::from).ok_or_else(|| user_not_found(id))
    }

    #[instrument(skip(self))]
    async fn set_username(
        &self,
        id: Snowflake,
        username: &str,
        changed_at: DateTime<Utc>,
    ) -> RepoResult<User> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            UPDATE users
            SET username = $2, last_username_change = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, role, avatar, online, appear_offline,
                      muted_until, muted_reason, suspended_at, suspended_reason,
                      last_username_change, created_at, updated_at
            ",
        )
        .bind(id.into_inner())
        .bind(username)
        .bind(changed_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::UsernameTaken))?;

        result.map(User::from).ok_or_else(|| user_not_found(id))
    }

    #[instrument(skip(self))]
    async fn set_mute(&self, id: Snowflake, mute: &Mute) -> RepoResult<User> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            UPDATE users
            SET muted_until = $2, muted_reason = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, role, avatar, online, appear_offline,
                      muted_until, muted_reason, suspended_at, suspended_reason,
                      last_username_change, created_at, updated_at
            ",
        )
        .bind(id.into_inner())
        .bind(mute.until)
        .bind(&mute.reason)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(User::from).ok_or_else(|| user_not_found(id))
    }

    #[instrument(skip(self))]
    async fn clear_mute(&self, id: Snowflake) -> RepoResult<User> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            UPDATE users
            SET muted_until = NULL, muted_reason = NULL, updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, role, avatar, online, appear_offline,
                      muted_until, muted_reason, suspended_at, suspended_reason,
                      last_username_change, created_at, updated_at
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(User::from).ok_or_else(|| user_not_found(id))
    }

    #[instrument(skip(self))]
    async fn set_suspension(
        &self,
        id: Snowflake,
        suspension: Option<&Suspension>,
    ) -> RepoResult<User> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            UPDATE users
            SET suspended_at = $2, suspended_reason = $3,
                online = CASE WHEN $2 IS NULL THEN online ELSE FALSE END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, role, avatar, online, appear_offline,
                      muted_until, muted_reason, suspended_at, suspended_reason,
                      last_username_change, created_at, updated_at
            ",
        )
        .bind(id.into_inner())
        .bind(suspension.map(|s| s.at))
        .bind(suspension.map(|s| s.reason.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(User::from).ok_or_else(|| user_not_found(id))
    }

    #[instrument(skip(self))]
    async fn set_role(&self, id: Snowflake, role: Role) -> RepoResult<User> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            UPDATE users
            SET role = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, username, role, avatar, online, appear_offline,
                      muted_until, muted_reason, suspended_at, suspended_reason,
                      last_username_change, created_at, updated_at
            ",
        )
        .bind(id.into_inner())
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(User::from).ok_or_else(|| user_not_found(id))
    }

    #[instrument(skip(self))]
    async fn set_online(&self, id: Snowflake, online: bool) -> RepoResult<()> {
        let result = sqlx::query("UPDATE users SET online = $2 WHERE id = $1")
            .bind(id.into_inner())
            .bind(online)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE id = $1")
            .bind(id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)
    }

    #[instrument(skip(self, password_hash))]
    async fn update_password(&self, id: Snowflake, password_hash: &str) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET password_hash = $2, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Snowflake) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.into_inner())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }

        Ok(())
    }
}
