use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;

use super::portfolio_model::{NewPortfolioAsset, PortfolioAsset, PortfolioValuation, Preset};
use super::portfolio_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
use crate::errors::Result;
use crate::holdings::Holding;
use crate::valuation::ValuationServiceTrait;

pub struct PortfolioService {
    repository: Arc<dyn PortfolioRepositoryTrait>,
    valuation: Arc<dyn ValuationServiceTrait>,
}

impl PortfolioService {
    pub fn new(
        repository: Arc<dyn PortfolioRepositoryTrait>,
        valuation: Arc<dyn ValuationServiceTrait>,
    ) -> Self {
        Self {
            repository,
            valuation,
        }
    }
}

#[async_trait]
impl PortfolioServiceTrait for PortfolioService {
    fn get_portfolio(&self, owner_id: i32, preset: Preset) -> Result<Vec<PortfolioAsset>> {
        self.repository.list_assets(owner_id, preset)
    }

    async fn save_portfolio(
        &self,
        owner_id: i32,
        preset: Preset,
        assets: Vec<NewPortfolioAsset>,
    ) -> Result<Vec<PortfolioAsset>> {
        let assets = assets
            .into_iter()
            .map(NewPortfolioAsset::validate)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let saved = self
            .repository
            .replace_assets(owner_id, preset, assets)
            .await?;
        info!(
            "Saved {} assets for user {} preset {}",
            saved.len(),
            owner_id,
            preset
        );
        Ok(saved)
    }

    async fn value_portfolio(&self, owner_id: i32, preset: Preset) -> Result<PortfolioValuation> {
        let assets = self.repository.list_assets(owner_id, preset)?;
        let holdings: Vec<Holding> = assets.iter().map(PortfolioAsset::to_holding).collect();
        debug!(
            "Valuing preset {} of user {} ({} assets)",
            preset,
            owner_id,
            holdings.len()
        );

        let report = self.valuation.value(&holdings).await?;
        Ok(PortfolioValuation { assets, report })
    }
}
