//! SQLite storage implementation for portfolio assets.

mod model;
mod repository;

pub use model::{NewPortfolioAssetDB, PortfolioAssetDB};
pub use repository::PortfolioRepository;
