//! SQLite storage implementation for Folio.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `folio-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for users and portfolio assets
//! - Database-specific model types (with Diesel derives)
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//!
//! ```text
//! folio-core (domain, traits)
//!          │
//!          ▼
//! storage-sqlite (this crate)
//!          │
//!          ▼
//!      SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod portfolio;
pub mod users;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use portfolio::PortfolioRepository;
pub use users::UserRepository;

// Re-export from folio-core for convenience
pub use folio_core::errors::{DatabaseError, Error, Result};
