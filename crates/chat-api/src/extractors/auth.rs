//! Authentication extractor
//!
//! Reads the session token from the session cookie, falling back to an
//! `Authorization: Bearer` header, and resolves it to a live session.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use axum_extra::extract::cookie::CookieJar;
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use chat_common::AppError;
use chat_core::{Snowflake, User};
use chat_service::AuthService;

use crate::response::ApiError;
use crate::state::AppState;

/// The caller behind a valid session
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Snowflake,
    pub user: User,
    pub session_id: String,
}

/// Session token from the named cookie, else from a bearer header
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let from_cookie = CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty());

    from_cookie.or_else(|| {
        headers
            .typed_get::<Authorization<Bearer>>()
            .map(|Authorization(bearer)| bearer.token().to_string())
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = session_token(&parts.headers, &app_state.config().session.cookie_name)
            .ok_or(ApiError::App(AppError::MissingAuth))?;

        let session = AuthService::new(app_state.service_context())
            .authenticate(&token)
            .await
            .inspect_err(|e| tracing::debug!(error = %e, "Session rejected"))?;

        Ok(AuthUser {
            user_id: session.user.id,
            user: session.user,
            session_id: session.session_id,
        })
    }
}
