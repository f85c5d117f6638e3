//! Unified error handling for the REST surface.
//!
//! Provides a single `ApiError` type mapping every failure to its response:
//! validation errors to 422 with field detail, missing rows to 404, unique
//! conflicts to 409, authentication failures to a redirect to `/auth/`,
//! role-gate failures to a generic 403 and store/cache failures to a 500
//! carrying the underlying message. All route handlers return
//! `Result<T, ApiError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use mercato_core::ValidationError;
use mercato_db::DbError;

/// Application-level error type for the REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Input failed business-rule validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Entity absent for the given id.
    #[error("{entity} with id={id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// Duplicate unique field on create.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No session cookie on a protected route.
    #[error("Token not found")]
    TokenMissing,

    /// Session cookie present but not a valid token.
    #[error("Invalid token")]
    TokenInvalid,

    /// Session token expired.
    #[error("Token expired")]
    TokenExpired,

    /// Token subject no longer resolves to a user row.
    #[error("Token user not found")]
    TokenUserMissing,

    /// Login failed; lookup miss and password mismatch are identical.
    #[error("Invalid email or password")]
    LoginFailed,

    /// Authenticated but the role gate is not satisfied.
    #[error("Insufficient permissions")]
    Forbidden,

    /// Bulk upload rejected (wrong file type, malformed row).
    #[error("Upload rejected: {0}")]
    BadUpload(String),

    /// Store or cache failure.
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    /// Internal error outside the store (hashing, serialization).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// True for the authentication failure states that redirect to the
    /// login surface instead of answering with a status code.
    fn redirects_to_auth(&self) -> bool {
        matches!(
            self,
            ApiError::TokenMissing
                | ApiError::TokenInvalid
                | ApiError::TokenExpired
                | ApiError::TokenUserMissing
        )
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadUpload(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::LoginFailed => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::TokenMissing
            | ApiError::TokenInvalid
            | ApiError::TokenExpired
            | ApiError::TokenUserMissing => StatusCode::UNAUTHORIZED,
            ApiError::Db(db) => match db {
                DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
                DbError::ForeignKeyViolation { .. }
                | DbError::CheckViolation { .. }
                | DbError::UnfilteredDelete { .. }
                | DbError::EmptyUpdate { .. }
                | DbError::UnknownTimeColumn { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Unauthenticated requests land on the login surface, a deliberate
        // choice for this browser-facing API.
        if self.redirects_to_auth() {
            tracing::debug!(error = %self, "redirecting unauthenticated request to /auth/");
            return Redirect::temporary("/auth/").into_response();
        }

        let status = self.status();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }

        // The 500 detail carries the underlying store message
        let body = Json(json!({ "detail": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failures_redirect() {
        for err in [
            ApiError::TokenMissing,
            ApiError::TokenInvalid,
            ApiError::TokenExpired,
            ApiError::TokenUserMissing,
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
            assert_eq!(
                response.headers().get(axum::http::header::LOCATION).unwrap(),
                "/auth/"
            );
        }
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::NotFound { entity: "product", id: 9 }.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Conflict("duplicate".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            ApiError::Db(DbError::UniqueViolation {
                constraint: "users_email_key".into()
            })
            .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Db(DbError::UnfilteredDelete { entity: "users" }).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Db(DbError::QueryFailed("boom".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_names_the_id() {
        let err = ApiError::NotFound { entity: "customer", id: 17 };
        assert_eq!(err.to_string(), "customer with id=17 not found");
    }
}
