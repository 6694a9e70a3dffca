use async_trait::async_trait;

use super::rates_model::{ConversionRates, RatePair};
use crate::errors::Result;

/// Trait defining the contract for conversion rate lookups.
#[async_trait]
pub trait RateServiceTrait: Send + Sync {
    async fn fetch_rate(&self, pair: RatePair) -> Result<f64>;

    async fn fetch_usd_krw(&self) -> Result<f64> {
        self.fetch_rate(RatePair::UsdKrw).await
    }

    async fn fetch_usdt_krw(&self) -> Result<f64> {
        self.fetch_rate(RatePair::UsdtKrw).await
    }

    /// Both rates. Either failing fails the pair.
    async fn fetch_rates(&self) -> Result<ConversionRates> {
        let (usd_krw, usdt_krw) = futures::try_join!(self.fetch_usd_krw(), self.fetch_usdt_krw())?;
        Ok(ConversionRates::new(usd_krw, usdt_krw))
    }
}
