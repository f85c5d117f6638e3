//! # mercato-core: Pure Domain Logic for Mercato
//!
//! This crate is the heart of the Mercato retail-sales backend. It contains
//! the domain model and business rules as pure code with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mercato Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/rest-api (axum)                         │   │
//! │  │    routes, cookie-JWT auth, role gates, error mapping           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ mercato-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │   types   │  │   roles   │  │validation │  │   error   │   │   │
//! │  │   │ Customer  │  │  RoleSet  │  │   rules   │  │  typed    │   │   │
//! │  │   │ Product.. │  │Capability │  │  checks   │  │  errors   │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    mercato-db (Database Layer)                  │   │
//! │  │        PostgreSQL repositories, migrations, CSV cache           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Customer, Product, Sale, SaleDetail, User)
//! - [`roles`] - Role set and capability gates
//! - [`validation`] - Business rule validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic (modulo "today")
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod roles;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use mercato_core::Customer` instead of
// `use mercato_core::types::Customer`

pub use error::{CoreError, CoreResult, ValidationError};
pub use roles::{Capability, Role, RoleSet};
pub use types::*;
