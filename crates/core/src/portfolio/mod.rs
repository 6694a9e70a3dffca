//! Portfolio module - stored assets per user and preset, and their valuation.

mod portfolio_model;
mod portfolio_service;
mod portfolio_traits;


pub use portfolio_model::{NewPortfolioAsset, PortfolioAsset, PortfolioValuation, Preset};
pub use portfolio_service::PortfolioService;
pub use portfolio_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
