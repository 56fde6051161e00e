//! Moderation service
//!
//! Mute and unmute need moderator or above; suspension and role changes need
//! admin or above. On top of the role gate the actor must outrank the target
//! (the owner may act on anyone but themself).

use chat_core::entities::{Mute, Role, Suspension, User};
use chat_core::{DomainError, Snowflake};
use chrono::{Duration, Utc};
use tracing::{info, instrument, warn};

use crate::dto::{ChangeRoleRequest, MuteRequest, SuspendRequest, UserResponse, MAX_MUTE_MINUTES};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Moderation service
pub struct ModerationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ModerationService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Mute `target_id` for `duration_minutes` with a reason
    #[instrument(skip(self, request), fields(minutes = request.duration_minutes))]
    pub async fn mute(
        &self,
        actor_id: Snowflake,
        target_id: Snowflake,
        request: MuteRequest,
    ) -> ServiceResult<UserResponse> {
        if !(1..=MAX_MUTE_MINUTES).contains(&request.duration_minutes) {
            return Err(ServiceError::validation(format!(
                "duration_minutes must be between 1 and {MAX_MUTE_MINUTES}"
            )));
        }
        let reason = require_reason(&request.reason)?;

        self.authorize(actor_id, target_id, Role::Moderator).await?;

        let until = Utc::now() + Duration::minutes(request.duration_minutes);
        let target = self
            .ctx
            .user_repo()
            .set_mute(target_id, &Mute { until, reason })
            .await?;

        info!(actor_id = %actor_id, target_id = %target_id, muted_until = %until, "User muted");
        Ok(UserResponse::from(&target))
    }

    #[instrument(skip(self))]
    pub async fn unmute(&self, actor_id: Snowflake, target_id: Snowflake) -> ServiceResult<UserResponse> {
        self.authorize(actor_id, target_id, Role::Moderator).await?;
        let target = self.ctx.user_repo().clear_mute(target_id).await?;

        info!(actor_id = %actor_id, target_id = %target_id, "User unmuted");
        Ok(UserResponse::from(&target))
    }

    /// Suspend: blocks login, ends every session, marks the user offline
    #[instrument(skip(self, request))]
    pub async fn suspend(
        &self,
        actor_id: Snowflake,
        target_id: Snowflake,
        request: SuspendRequest,
    ) -> ServiceResult<UserResponse> {
        let reason = require_reason(&request.reason)?;
        self.authorize(actor_id, target_id, Role::Admin).await?;

        let suspension = Suspension {
            at: Utc::now(),
            reason,
        };
        let target = self
            .ctx
            .user_repo()
            .set_suspension(target_id, Some(&suspension))
            .await?;

        let sessions = self.ctx.session_repo().delete_for_user(target_id).await?;
        self.ctx.typing().clear_user(target_id);

        info!(actor_id = %actor_id, target_id = %target_id, sessions, "User suspended");
        Ok(UserResponse::from(&target))
    }

    #[instrument(skip(self))]
    pub async fn unsuspend(&self, actor_id: Snowflake, target_id: Snowflake) -> ServiceResult<UserResponse> {
        self.authorize(actor_id, target_id, Role::Admin).await?;
        let target = self.ctx.user_repo().set_suspension(target_id, None).await?;

        info!(actor_id = %actor_id, target_id = %target_id, "User unsuspended");
        Ok(UserResponse::from(&target))
    }

    /// Change a user's role. Only the owner may hand out the owner role, and
    /// nobody may promote someone to a rank above their own.
    #[instrument(skip(self, request), fields(role = %request.role))]
    pub async fn change_role(
        &self,
        actor_id: Snowflake,
        target_id: Snowflake,
        request: ChangeRoleRequest,
    ) -> ServiceResult<UserResponse> {
        let new_role: Role = request.role.trim().parse()?;
        let (actor, target) = self.authorize(actor_id, target_id, Role::Admin).await?;

        if new_role > actor.role || (new_role == Role::Owner && actor.role != Role::Owner) {
            warn!(actor_id = %actor_id, target_id = %target_id, "Role change refused: rank too high");
            return Err(DomainError::InsufficientRole { required: new_role }.into());
        }

        let previous = target.role;
        let target = self.ctx.user_repo().set_role(target_id, new_role).await?;

        info!(actor_id = %actor_id, target_id = %target_id, from = %previous, to = %new_role, "Role changed");
        Ok(UserResponse::from(&target))
    }

    /// Role gate, then the rank check between actor and target
    async fn authorize(
        &self,
        actor_id: Snowflake,
        target_id: Snowflake,
        required: Role,
    ) -> ServiceResult<(User, User)> {
        let actor = self.load(actor_id).await?;
        actor
            .role
            .require(required)
            .inspect_err(|_| warn!(actor_id = %actor_id, required = %required, "Moderation refused: role"))?;

        let target = self.load(target_id).await?;
        actor
            .ensure_can_moderate(&target)
            .inspect_err(|_| warn!(actor_id = %actor_id, target_id = %target_id, "Moderation refused: target rank"))?;

        Ok((actor, target))
    }

    async fn load(&self, user_id: Snowflake) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id).into())
    }
}

fn require_reason(reason: &str) -> ServiceResult<String> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(ServiceError::validation("reason is required"));
    }
    Ok(reason.to_string())
}
