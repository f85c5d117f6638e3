//! Authentication route handlers: register, login, logout.
//!
//! Login sets the session JWT as an HTTP-only cookie; logout clears it.
//! `GET /auth/` is the landing surface unauthenticated requests are
//! redirected to.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use mercato_core::NewUser;

use crate::auth::{authenticate, hash_password, ACCESS_TOKEN_COOKIE};
use crate::error::ApiError;
use crate::AppState;

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(auth_page))
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/logout/", post(logout_user))
}

/// Login surface banner (the redirect target for unauthenticated requests).
async fn auth_page() -> Json<Value> {
    Json(json!({ "message": "Mercato authentication" }))
}

/// Registers a new account.
///
/// A taken email is a conflict; the unique index backs this check up
/// against concurrent registrations.
async fn register_user(
    State(state): State<AppState>,
    Json(mut user): Json<NewUser>,
) -> Result<Json<Value>, ApiError> {
    user.validate()?;

    if state.db.users().find_by_email(&user.email).await?.is_some() {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    user.password = hash_password(&user.password)?;
    let created = state.db.users().insert(&user).await?;

    info!(user_id = created.id, "user registered");
    Ok(Json(json!({ "message": "User registered successfully!" })))
}

/// Logs a user in and sets the session cookie.
async fn login_user(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginPayload>,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    let user = authenticate(&state.db, &payload.email, &payload.password)
        .await?
        .ok_or(ApiError::LoginFailed)?;

    let token = state.jwt.issue(user.id)?;

    let cookie = Cookie::build((ACCESS_TOKEN_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .build();

    info!(user_id = user.id, "user logged in");
    Ok((
        jar.add(cookie),
        Json(json!({ "access_token": token, "refresh_token": null })),
    ))
}

/// Logs the user out by clearing the session cookie.
async fn logout_user(jar: CookieJar) -> (CookieJar, Json<Value>) {
    let mut removal = Cookie::from(ACCESS_TOKEN_COOKIE);
    removal.set_path("/");
    (
        jar.remove(removal),
        Json(json!({ "message": "Logged out successfully" })),
    )
}
