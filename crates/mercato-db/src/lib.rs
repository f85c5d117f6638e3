//! # mercato-db: Database Layer for Mercato
//!
//! This crate provides data access for the Mercato retail-sales backend:
//! PostgreSQL through sqlx, plus the Redis cache backing CSV exports.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mercato Data Flow                                │
//! │                                                                         │
//! │  Route handler (GET /products/)                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                     mercato-db (THIS CRATE)                     │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐    │    │
//! │  │   │   Database    │    │ Repository<E> │    │  Migrations  │    │    │
//! │  │   │   (pool.rs)   │    │  (generic)    │    │  (embedded)  │    │    │
//! │  │   │               │    │               │    │              │    │    │
//! │  │   │ PgPool        │◄───│ five entity   │    │ 0001_init…   │    │    │
//! │  │   │ management    │    │ bindings      │    │              │    │    │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘    │    │
//! │  │                                │                                │    │
//! │  │                        ┌───────▼───────┐                        │    │
//! │  │                        │   CsvCache    │  Redis, 1h expiry      │    │
//! │  │                        └───────────────┘                        │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PostgreSQL + Redis                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`error`] - Database error types
//! - [`repository`] - The generic repository and per-entity bindings
//! - [`cache`] - Redis-backed CSV export cache
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mercato_db::{Database, DbConfig};
//!
//! let db = Database::connect(DbConfig::new(url)).await?;
//! let products = db.products().find_all(&ProductFilter::default()).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cache;
pub mod error;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use cache::{CsvCache, CSV_CACHE_TTL_SECS};
pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::{Entity, EntityFilter, InsertRow, Repository, SqlValue};

// Entity binding re-exports for convenience
pub use repository::customer::{CustomerFilter, CustomerPatch};
pub use repository::product::{ProductFilter, ProductPatch};
pub use repository::sale::{SaleFilter, SalePatch};
pub use repository::sale_detail::{SaleDetailFilter, SaleDetailPatch};
pub use repository::user::{UserFilter, UserPatch};
