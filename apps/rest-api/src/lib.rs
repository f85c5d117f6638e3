//! # Mercato REST API
//!
//! HTTP server for the Mercato retail-sales dataset.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         REST API Layers                                 │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐ │
//! │  │  routes/*      │  │  extract       │  │  auth                      │ │
//! │  │                │  │                │  │                            │ │
//! │  │ per-entity     │  │ CurrentUser    │  │ argon2 hashing             │ │
//! │  │ handlers       │  │ role gates     │  │ JwtManager (cookie JWT)    │ │
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘ │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐   │
//! │  │                      Infrastructure                              │   │
//! │  │                                                                  │   │
//! │  │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────────┐│   │
//! │  │  │  PostgreSQL  │  │    Redis     │  │  ApiConfig               ││   │
//! │  │  │ (mercato-db) │  │  CSV cache   │  │  env, loaded at startup  ││   │
//! │  │  └──────────────┘  └──────────────┘  └──────────────────────────┘│   │
//! │  └──────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `DATABASE_URL` - PostgreSQL connection string
//! - `REDIS_URL` - Redis connection string
//! - `HTTP_PORT` - HTTP server port (default: 8000)
//! - `JWT_SECRET` - Secret for JWT signing
//! - `JWT_ALGORITHM` - Signing algorithm (default: HS256)
//! - `JWT_LIFETIME_DAYS` - Session token lifetime (default: 30)

pub mod auth;
pub mod bulk;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;

// Re-exports
pub use config::ApiConfig;
pub use error::ApiError;

use mercato_db::{CsvCache, Database};

use crate::auth::JwtManager;

/// Shared application state.
///
/// Constructed once at startup and injected into every handler; there are
/// no ambient singletons.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub csv_cache: CsvCache,
    pub jwt: JwtManager,
    pub config: ApiConfig,
}

/// Builds the full application router over the given state.
pub fn app(state: AppState) -> axum::Router {
    routes::router(state)
}
