//! # Database Error Types
//!
//! Error types for database and cache operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  PostgreSQL / Redis error (sqlx::Error, redis::RedisError)              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  DbError (this module) ← Adds context and categorization                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ApiError (in rest-api) ← Status code + JSON body                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Client sees a uniform error response                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Database operation errors.
///
/// These errors wrap sqlx/redis errors and provide additional context
/// for the HTTP layer's status mapping.
#[derive(Debug, Error)]
pub enum DbError {
    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting a duplicate email/phone/product name
    /// - Any UNIQUE index violation
    #[error("Duplicate value: constraint '{constraint}' violated")]
    UniqueViolation { constraint: String },

    /// Foreign key constraint violation.
    ///
    /// ## When This Occurs
    /// - Referencing a non-existent customer_id, sale_id or product_id
    /// - Deleting a row still referenced by line items
    #[error("Foreign key violation: constraint '{constraint}'")]
    ForeignKeyViolation { constraint: String },

    /// Check constraint violation (negative price/quantity at the store).
    #[error("Check violation: constraint '{constraint}'")]
    CheckViolation { constraint: String },

    /// A delete with an empty filter was attempted without the explicit
    /// delete-all acknowledgement.
    #[error("Refusing to delete all rows from {entity} without allow_delete_all")]
    UnfilteredDelete { entity: &'static str },

    /// An update was attempted with no changes to apply.
    #[error("No fields to update for {entity}")]
    EmptyUpdate { entity: &'static str },

    /// A time-range query named a column outside the entity's allow-list.
    #[error("'{column}' is not a time-range column of {entity}")]
    UnknownTimeColumn {
        entity: &'static str,
        column: String,
    },

    /// Database connection failed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Redis cache operation failed.
    #[error("Cache error: {0}")]
    Cache(String),

    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(String),

    /// Internal database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Convert sqlx errors to DbError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database + kind  → Unique/ForeignKey/Check violation
/// sqlx::Error::PoolTimedOut     → DbError::PoolExhausted
/// sqlx::Error::PoolClosed       → DbError::ConnectionFailed
/// Other                         → DbError::QueryFailed / Internal
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                match db_err.kind() {
                    sqlx::error::ErrorKind::UniqueViolation => {
                        DbError::UniqueViolation { constraint }
                    }
                    sqlx::error::ErrorKind::ForeignKeyViolation => {
                        DbError::ForeignKeyViolation { constraint }
                    }
                    sqlx::error::ErrorKind::CheckViolation => {
                        DbError::CheckViolation { constraint }
                    }
                    _ => DbError::QueryFailed(db_err.message().to_string()),
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,

            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),

            sqlx::Error::Io(io_err) => DbError::ConnectionFailed(io_err.to_string()),

            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<redis::RedisError> for DbError {
    fn from(err: redis::RedisError) -> Self {
        DbError::Cache(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_error_messages() {
        let err = DbError::UnfilteredDelete { entity: "products" };
        assert_eq!(
            err.to_string(),
            "Refusing to delete all rows from products without allow_delete_all"
        );

        let err = DbError::UnknownTimeColumn {
            entity: "products",
            column: "unit_price".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "'unit_price' is not a time-range column of products"
        );
    }
}
