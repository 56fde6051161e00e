//! User service
//!
//! Profile reads and updates, username and password changes, account deletion.

use chat_common::auth::validate_password_strength;
use chat_core::entities::{validate_username, User};
use chat_core::traits::ProfileUpdate;
use chat_core::{DomainError, Snowflake};
use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::dto::{
    ChangePasswordRequest, ChangeUsernameRequest, CurrentUserResponse, DeleteAccountRequest,
    UpdateProfileRequest, UserResponse,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Get current user (full profile)
    #[instrument(skip(self))]
    pub async fn get_current_user(&self, user_id: Snowflake) -> ServiceResult<CurrentUserResponse> {
        let user = self.load(user_id).await?;
        Ok(CurrentUserResponse::from(&user))
    }

    /// Get user by ID (public profile)
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: Snowflake) -> ServiceResult<UserResponse> {
        let user = self.load(user_id).await?;
        Ok(UserResponse::from(&user))
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self, limit: i64, offset: i64) -> ServiceResult<Vec<UserResponse>> {
        let users = self.ctx.user_repo().list(limit, offset).await?;
        Ok(users.iter().map(UserResponse::from).collect())
    }

    /// Update appear-offline and avatar
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        user_id: Snowflake,
        request: UpdateProfileRequest,
    ) -> ServiceResult<CurrentUserResponse> {
        let update = ProfileUpdate {
            appear_offline: request.appear_offline,
            avatar: request.avatar.map(|avatar| {
                let avatar = avatar.trim();
                (!avatar.is_empty()).then(|| avatar.to_string())
            }),
        };
        let user = self.ctx.user_repo().set_profile(user_id, &update).await?;

        info!(user_id = %user_id, "Profile updated");
        Ok(CurrentUserResponse::from(&user))
    }

    /// Change username: password-confirmed, once per cooldown window
    #[instrument(skip(self, request), fields(new_username = %request.new_username))]
    pub async fn change_username(
        &self,
        user_id: Snowflake,
        request: ChangeUsernameRequest,
    ) -> ServiceResult<CurrentUserResponse> {
        let user = self.load(user_id).await?;
        self.verify_password(&user, &request.current_password).await?;

        let now = Utc::now();
        user.ensure_can_change_username(now)?;

        let new_username = request.new_username.trim().to_string();
        validate_username(&new_username)?;

        if let Some(existing) = self.ctx.user_repo().find_by_username(&new_username).await? {
            if existing.id != user.id {
                return Err(DomainError::UsernameTaken.into());
            }
        }

        let renamed = self
            .ctx
            .user_repo()
            .set_username(user_id, &new_username, now)
            .await?;

        info!(user_id = %user_id, old_username = %user.username, "Username changed");
        Ok(CurrentUserResponse::from(&renamed))
    }

    #[instrument(skip(self, request))]
    pub async fn change_password(
        &self,
        user_id: Snowflake,
        request: ChangePasswordRequest,
    ) -> ServiceResult<()> {
        let user = self.load(user_id).await?;
        self.verify_password(&user, &request.current_password).await?;
        validate_password_strength(&request.new_password)?;

        let hash = self.ctx.password_service().hash(&request.new_password)?;
        self.ctx.user_repo().update_password(user_id, &hash).await?;

        info!(user_id = %user_id, "Password changed");
        Ok(())
    }

    /// Delete the account: leave every room (removing rooms left empty),
    /// drop sessions, then remove the user.
    #[instrument(skip(self, request))]
    pub async fn delete_account(
        &self,
        user_id: Snowflake,
        request: DeleteAccountRequest,
    ) -> ServiceResult<()> {
        let user = self.load(user_id).await?;
        self.verify_password(&user, &request.password).await?;

        let rooms = self.ctx.member_repo().rooms_for_user(user_id).await?;
        let mut rooms_deleted = 0;
        for room_id in rooms {
            if self.ctx.member_repo().remove(room_id, user_id).await? {
                self.ctx.mention_repo().clear_room(user_id, room_id).await?;
            }
            if self.ctx.room_repo().delete_if_empty(room_id).await? {
                rooms_deleted += 1;
            }
        }

        self.ctx.session_repo().delete_for_user(user_id).await?;
        self.ctx.typing().clear_user(user_id);
        self.ctx.user_repo().delete(user_id).await?;

        info!(user_id = %user_id, rooms_deleted, "Account deleted");
        Ok(())
    }

    async fn verify_password(&self, user: &User, password: &str) -> ServiceResult<()> {
        let hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or_else(|| ServiceError::internal("user has no password hash"))?;

        self.ctx
            .password_service()
            .verify_current(password, &hash)
            .inspect_err(|_| warn!(user_id = %user.id, "Password confirmation failed"))?;
        Ok(())
    }

    async fn load(&self, user_id: Snowflake) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id).into())
    }
}
