//! Authentication handlers
//!
//! Registration, login and logout. Successful auth sets the session cookie;
//! the token is also returned in the body for bearer clients.

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chat_common::SessionConfig;
use chat_service::dto::{AuthResponse, LoginRequest, RegisterRequest};
use chat_service::AuthService;
use chrono::Utc;

use crate::extractors::{AuthUser, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent};
use crate::state::AppState;

/// Session cookie carrying `token` for `max_age_secs`
pub fn session_cookie(config: &SessionConfig, token: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .secure(config.cookie_secure)
        .max_age(time::Duration::seconds(max_age_secs.max(0)))
        .build()
}

/// Removal cookie matching the name and path of [`session_cookie`]
pub fn expired_session_cookie(config: &SessionConfig) -> Cookie<'static> {
    Cookie::build(config.cookie_name.clone()).path("/").build()
}

fn with_session(jar: CookieJar, state: &AppState, response: &AuthResponse) -> CookieJar {
    let max_age = (response.expires_at - Utc::now()).num_seconds();
    jar.add(session_cookie(&state.config().session, response.token.clone(), max_age))
}

/// Register a new user
///
/// POST /api/register
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<(CookieJar, Created<Json<AuthResponse>>)> {
    let response = AuthService::new(state.service_context()).register(request).await?;
    let jar = with_session(jar, &state, &response);
    Ok((jar, Created(Json(response))))
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<(CookieJar, Json<AuthResponse>)> {
    let response = AuthService::new(state.service_context()).login(request).await?;
    let jar = with_session(jar, &state, &response);
    Ok((jar, Json(response)))
}

/// End the current session and clear the cookie
///
/// POST /api/logout
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    auth: AuthUser,
) -> ApiResult<(CookieJar, NoContent)> {
    AuthService::new(state.service_context())
        .logout(auth.user_id, &auth.session_id)
        .await?;
    let jar = jar.remove(expired_session_cookie(&state.config().session));
    Ok((jar, NoContent))
}
