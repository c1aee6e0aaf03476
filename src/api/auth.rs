use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, validation};
use crate::db::User;
use crate::entities::users::ROLE_SUPER_ADMIN;

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_id: i32,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Verified identity of the caller, inserted into request extensions by the
/// `authenticate` middleware.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: i32,
    pub email: String,
    pub role: String,
}

impl CurrentUser {
    #[must_use]
    pub fn is_super_admin(&self) -> bool {
        self.role == ROLE_SUPER_ADMIN
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Authentication middleware that accepts:
/// 1. The `accessToken` http-only cookie (browser clients)
/// 2. `Authorization: Bearer <token>` header (api clients)
pub async fn authenticate(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_access_token(&jar, request.headers())
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    let claims = state
        .tokens()
        .verify(&token)
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;

    request.extensions_mut().insert(CurrentUser {
        user_id: claims.sub,
        email: claims.email,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

/// Role gate for admin-only handlers; extraction fails with 403 for any
/// authenticated caller that is not the super admin.
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

        if !user.is_super_admin() {
            return Err(ApiError::forbidden("Super admin access required"));
        }

        Ok(Self(user))
    }
}

fn extract_access_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(ACCESS_COOKIE) {
        return Some(cookie.value().to_string());
    }

    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<RegisterResponse>>, ApiError> {
    validation::validate_required(&payload.name, "Name")?;
    let email = validation::validate_email(&payload.email)?;
    validation::validate_password(&payload.password)?;

    let user = state
        .store()
        .create_user(&payload.name, email, &payload.password)
        .await
        .map_err(|e| ApiError::internal(format!("Registration failed: {e}")))?
        .ok_or_else(|| ApiError::conflict("User already exists"))?;

    tracing::info!(user_id = user.id, "User registered");

    Ok(Json(ApiResponse::success(RegisterResponse {
        user_id: user.id,
    })))
}

/// POST /auth/login
/// On success both token cookies are set; on a credential mismatch no
/// cookie is touched.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<LoginResponse>>), ApiError> {
    if payload.email.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let user = state
        .store()
        .verify_credentials(&payload.email, &payload.password)
        .await
        .map_err(|e| ApiError::internal(format!("Authentication error: {e}")))?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let jar = issue_session(&state, &user, jar).await?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok((
        jar,
        Json(ApiResponse::success(LoginResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        })),
    ))
}

/// POST /auth/refresh-token
/// Rotates both tokens; the presented refresh token is single-use.
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse<MessageResponse>>), ApiError> {
    let presented = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| ApiError::unauthorized("No refresh token provided"))?;

    let user = state
        .store()
        .get_user_by_refresh_token(&presented)
        .await
        .map_err(|e| ApiError::internal(format!("Token refresh error: {e}")))?
        .ok_or_else(|| ApiError::unauthorized("Invalid refresh token"))?;

    let jar = issue_session(&state, &user, jar).await?;

    Ok((
        jar,
        Json(ApiResponse::success(MessageResponse {
            message: "Access token refreshed successfully".to_string(),
        })),
    ))
}

/// POST /auth/logout
/// Clears both cookies and revokes the stored refresh token, so a stolen
/// refresh token is useless after logout.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse<MessageResponse>>), ApiError> {
    if let Some(cookie) = jar.get(REFRESH_COOKIE) {
        let presented = cookie.value().to_string();
        if let Some(user) = state
            .store()
            .get_user_by_refresh_token(&presented)
            .await
            .map_err(|e| ApiError::internal(format!("Logout error: {e}")))?
        {
            state
                .store()
                .set_refresh_token(user.id, None)
                .await
                .map_err(|e| ApiError::internal(format!("Logout error: {e}")))?;
        }
    }

    let jar = jar
        .remove(removal_cookie(ACCESS_COOKIE))
        .remove(removal_cookie(REFRESH_COOKIE));

    Ok((
        jar,
        Json(ApiResponse::success(MessageResponse {
            message: "Logged out successfully".to_string(),
        })),
    ))
}

// ============================================================================
// Helpers
// ============================================================================

/// Issue a fresh token pair, persist the refresh token and set both cookies
async fn issue_session(
    state: &Arc<AppState>,
    user: &User,
    jar: CookieJar,
) -> Result<CookieJar, ApiError> {
    let pair = state
        .tokens()
        .issue(user)
        .map_err(|e| ApiError::internal(format!("Failed to issue tokens: {e}")))?;

    state
        .store()
        .set_refresh_token(user.id, Some(&pair.refresh_token))
        .await
        .map_err(|e| ApiError::internal(format!("Failed to store refresh token: {e}")))?;

    let (secure, access_ttl_minutes, refresh_ttl_days) = {
        let config = state.config().read().await;
        (
            config.server.secure_cookies,
            config.auth.access_token_ttl_minutes,
            config.auth.refresh_token_ttl_days,
        )
    };

    Ok(jar
        .add(auth_cookie(
            ACCESS_COOKIE,
            pair.access_token,
            secure,
            time::Duration::minutes(access_ttl_minutes),
        ))
        .add(auth_cookie(
            REFRESH_COOKIE,
            pair.refresh_token,
            secure,
            time::Duration::days(refresh_ttl_days),
        )))
}

fn auth_cookie(
    name: &'static str,
    value: String,
    secure: bool,
    max_age: time::Duration,
) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(max_age)
        .build()
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, "")).path("/").build()
}
