//! Authentication service
//!
//! Handles registration, login, logout and session validation. A session is
//! a server-side row; the client holds a signed token naming it, so deleting
//! the row (logout, suspension) revokes the token at once.

use chat_common::auth::validate_password_strength;
use chat_common::AppError;
use chat_core::entities::{validate_username, Role, Session, User};
use chat_core::{DomainError, Snowflake};
use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dto::{AuthResponse, CurrentUserResponse, LoginRequest, RegisterRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// The caller behind a valid session token
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub user: User,
    pub session_id: String,
}

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new user. The very first account becomes the owner.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<AuthResponse> {
        let username = request.username.trim().to_string();
        validate_username(&username)?;
        validate_password_strength(&request.password)?;

        if self
            .ctx
            .user_repo()
            .find_by_username(&username)
            .await?
            .is_some()
        {
            return Err(DomainError::UsernameTaken.into());
        }

        let password_hash = self.ctx.password_service().hash(&request.password)?;

        let mut user = User::new(self.ctx.generate_id(), username, Role::User);
        user.online = true;
        let user = self.ctx.user_repo().create(&user, &password_hash).await?;

        info!(user_id = %user.id, role = %user.role, "User registered");

        self.open_session(&user).await
    }

    /// Login with username and password
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let mut user = self
            .ctx
            .user_repo()
            .find_by_username(request.username.trim())
            .await?
            .ok_or_else(|| {
                warn!("Login failed: unknown username");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user.id, "Login failed: no password hash");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        self.ctx
            .password_service()
            .verify_or_error(&request.password, &password_hash)
            .inspect_err(|_| warn!(user_id = %user.id, "Login failed: invalid password"))?;

        user.ensure_not_suspended()
            .inspect_err(|_| warn!(user_id = %user.id, "Login refused: account suspended"))?;

        self.ctx.user_repo().set_online(user.id, true).await?;
        user.online = true;

        info!(user_id = %user.id, "User logged in");

        self.open_session(&user).await
    }

    /// End the caller's session and mark them offline
    #[instrument(skip(self, session_id))]
    pub async fn logout(&self, user_id: Snowflake, session_id: &str) -> ServiceResult<()> {
        self.ctx.session_repo().delete(session_id).await?;
        self.ctx.user_repo().set_online(user_id, false).await?;

        info!(user_id = %user_id, "User logged out");
        Ok(())
    }

    /// Resolve a session token to its user.
    ///
    /// The user is checked before the session so a suspended account reports
    /// the suspension (with its reason) even though suspension already deleted
    /// the session row.
    #[instrument(skip(self, token))]
    pub async fn authenticate(&self, token: &str) -> ServiceResult<AuthenticatedSession> {
        let claims = self.ctx.jwt_service().verify(token)?;
        let user_id = claims.user_id()?;

        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::App(AppError::InvalidToken))?;

        user.ensure_not_suspended()?;

        let session = self
            .ctx
            .session_repo()
            .find(&claims.sid)
            .await?
            .filter(|s| s.user_id == user.id)
            .ok_or(ServiceError::App(AppError::SessionExpired))?;

        if session.is_expired_at(Utc::now()) {
            self.ctx.session_repo().delete(&session.id).await?;
            return Err(ServiceError::App(AppError::SessionExpired));
        }

        Ok(AuthenticatedSession {
            user,
            session_id: session.id,
        })
    }

    /// Delete sessions past their expiry
    #[instrument(skip(self))]
    pub async fn purge_expired_sessions(&self) -> ServiceResult<u64> {
        let removed = self.ctx.session_repo().delete_expired(Utc::now()).await?;
        if removed > 0 {
            info!(removed, "Purged expired sessions");
        }
        Ok(removed)
    }

    async fn open_session(&self, user: &User) -> ServiceResult<AuthResponse> {
        let session = Session::new(
            Uuid::new_v4().to_string(),
            user.id,
            self.ctx.settings().session_ttl,
        );
        self.ctx.session_repo().create(&session).await?;

        let token = self
            .ctx
            .jwt_service()
            .issue(user.id, &session.id, session.expires_at)?;

        Ok(AuthResponse::new(
            token,
            session.expires_at,
            CurrentUserResponse::from(user),
        ))
    }
}
