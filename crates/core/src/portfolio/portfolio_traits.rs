use async_trait::async_trait;

use super::portfolio_model::{NewPortfolioAsset, PortfolioAsset, PortfolioValuation, Preset};
use crate::errors::Result;

/// Trait defining the contract for portfolio persistence.
#[async_trait]
pub trait PortfolioRepositoryTrait: Send + Sync {
    fn list_assets(&self, owner_id: i32, preset: Preset) -> Result<Vec<PortfolioAsset>>;

    /// Replaces every asset of `owner_id` under `preset` in one transaction.
    async fn replace_assets(
        &self,
        owner_id: i32,
        preset: Preset,
        assets: Vec<NewPortfolioAsset>,
    ) -> Result<Vec<PortfolioAsset>>;
}

/// Trait defining the contract for portfolio operations.
#[async_trait]
pub trait PortfolioServiceTrait: Send + Sync {
    fn get_portfolio(&self, owner_id: i32, preset: Preset) -> Result<Vec<PortfolioAsset>>;

    async fn save_portfolio(
        &self,
        owner_id: i32,
        preset: Preset,
        assets: Vec<NewPortfolioAsset>,
    ) -> Result<Vec<PortfolioAsset>>;

    async fn value_portfolio(&self, owner_id: i32, preset: Preset) -> Result<PortfolioValuation>;
}
