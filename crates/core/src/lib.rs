//! Folio Core - Domain entities, services, and traits.
//!
//! This crate contains the valuation engine (price cache, rate and price
//! fetchers, valuation aggregator) and the user/portfolio services around it.
//! It is database-agnostic and defines repository traits that are implemented
//! by the `storage-sqlite` crate.

pub mod cache;
pub mod constants;
pub mod errors;
pub mod holdings;
pub mod portfolio;
pub mod pricing;
pub mod rates;
pub mod users;
pub mod utils;
pub mod valuation;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
