//! Authentication extractors.
//!
//! A request's auth context moves through one pipeline:
//! cookie extracted → token verified → user resolved → role checked.
//! Each step's failure short-circuits into its own [`ApiError`] condition;
//! the first three reject with a redirect to `/auth/`, the role check with
//! a generic 403. There is no retry within a request.
//!
//! # Example
//!
//! ```rust,ignore
//! async fn protected_handler(
//!     RequireAnalyst(user): RequireAnalyst,
//! ) -> impl IntoResponse {
//!     format!("Hello, {}!", user.email)
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;

use mercato_core::{Capability, User};

use crate::auth::ACCESS_TOKEN_COOKIE;
use crate::error::ApiError;
use crate::AppState;

/// Extractor that requires a valid session cookie and resolves the user.
///
/// Failure states, in pipeline order: cookie absent, token invalid, token
/// expired, subject row missing.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(ACCESS_TOKEN_COOKIE)
            .ok_or(ApiError::TokenMissing)?;

        let claims = state.jwt.decode(token.value())?;

        let user_id: i64 = claims.sub.parse().map_err(|_| ApiError::TokenInvalid)?;

        let user = state
            .db
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::TokenUserMissing)?;

        Ok(CurrentUser(user))
    }
}

/// Resolves the current user, then checks one capability.
async fn require_capability(
    parts: &mut Parts,
    state: &AppState,
    capability: Capability,
) -> Result<User, ApiError> {
    let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
    if user.roles().grants(capability) {
        Ok(user)
    } else {
        Err(ApiError::Forbidden)
    }
}

macro_rules! role_gate {
    ($(#[$doc:meta])* $name:ident => $capability:expr) => {
        $(#[$doc])*
        pub struct $name(pub User);

        impl FromRequestParts<AppState> for $name {
            type Rejection = ApiError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &AppState,
            ) -> Result<Self, Self::Rejection> {
                require_capability(parts, state, $capability)
                    .await
                    .map($name)
            }
        }
    };
}

role_gate! {
    /// Gate: catalog management, updates, deletes, CSV export
    /// (admin or super admin).
    RequireAdmin => Capability::Administer
}

role_gate! {
    /// Gate: user account management (super admin only).
    RequireSuperAdmin => Capability::ManageUsers
}

role_gate! {
    /// Gate: recording sales data (vendor, admin or super admin).
    RequireVendor => Capability::RecordSales
}

role_gate! {
    /// Gate: reading the dataset and aggregates (analyst, admin or super
    /// admin).
    RequireAnalyst => Capability::ViewAnalytics
}
