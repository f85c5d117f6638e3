//! Authentication primitives: password hashing and JWT session tokens.
//!
//! The secret and algorithm are loaded once at startup and held by the
//! [`JwtManager`] in the shared state; handlers never touch the raw secret.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mercato_core::User;
use mercato_db::Database;

use crate::error::ApiError;

/// Name of the HTTP-only session cookie carrying the JWT.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

// =============================================================================
// Password hashing
// =============================================================================

/// Hashes a plain password with argon2 (salted, PHC string output).
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {e}")))
}

/// Verifies a plain password against a stored PHC hash.
///
/// Any parse or verification failure is `false`; timing behavior is the
/// algorithm's own.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// =============================================================================
// JWT
// =============================================================================

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// JWT token manager.
#[derive(Clone)]
pub struct JwtManager {
    secret: String,
    algorithm: jsonwebtoken::Algorithm,
    lifetime_days: i64,
}

impl JwtManager {
    /// Create a new JWT manager.
    ///
    /// The algorithm name comes from configuration (`HS256` by default);
    /// an unknown name is a startup error, not a per-request one.
    pub fn new(secret: String, algorithm: &str, lifetime_days: i64) -> Result<Self, ApiError> {
        let algorithm = algorithm
            .parse()
            .map_err(|_| ApiError::Internal(format!("Unknown JWT algorithm: {algorithm}")))?;
        Ok(JwtManager {
            secret,
            algorithm,
            lifetime_days,
        })
    }

    /// Issue a session token for a user id.
    pub fn issue(&self, user_id: i64) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::days(self.lifetime_days);

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::new(self.algorithm),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ApiError::Internal(format!("Failed to issue token: {e}")))
    }

    /// Validate a token and return its claims.
    ///
    /// Distinguishes an expired token from every other defect; both are
    /// authentication failures but map to different conditions.
    pub fn decode(&self, token: &str) -> Result<Claims, ApiError> {
        let validation = Validation::new(self.algorithm);

        let token_data: TokenData<Claims> = decode(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => ApiError::TokenExpired,
            _ => ApiError::TokenInvalid,
        })?;

        Ok(token_data.claims)
    }
}

// =============================================================================
// Credential check
// =============================================================================

/// Authenticates an email/password pair against the user table.
///
/// A lookup miss and a password mismatch are indistinguishable to the
/// caller: both return `None` (no user-existence leakage).
pub async fn authenticate(
    db: &Database,
    email: &str,
    password: &str,
) -> Result<Option<User>, ApiError> {
    let Some(user) = db.users().find_by_email(email).await? else {
        return Ok(None);
    };

    if verify_password(password, &user.password) {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> JwtManager {
        JwtManager::new("test-secret".to_string(), "HS256", 30).unwrap()
    }

    #[test]
    fn test_jwt_roundtrip() {
        let token = manager().issue(42).unwrap();
        let claims = manager().decode(&token).unwrap();

        assert_eq!(claims.sub, "42");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_is_distinguished() {
        let expired = JwtManager::new("test-secret".to_string(), "HS256", -2).unwrap();
        let token = expired.issue(42).unwrap();

        let err = manager().decode(&token).unwrap_err();
        assert!(matches!(err, ApiError::TokenExpired));
    }

    #[test]
    fn test_garbage_token_is_invalid() {
        let err = manager().decode("not-a-jwt").unwrap_err();
        assert!(matches!(err, ApiError::TokenInvalid));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let other = JwtManager::new("other-secret".to_string(), "HS256", 30).unwrap();
        let token = other.issue(42).unwrap();

        let err = manager().decode(&token).unwrap_err();
        assert!(matches!(err, ApiError::TokenInvalid));
    }

    #[test]
    fn test_unknown_algorithm_is_a_startup_error() {
        assert!(JwtManager::new("s".to_string(), "ROT13", 30).is_err());
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("root1").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("root1", &hash));
        assert!(!verify_password("root2", &hash));
        assert!(!verify_password("root1", "not-a-phc-string"));
    }
}
