use async_trait::async_trait;

use super::pricing_model::PricedValue;
use crate::errors::Result;
use crate::holdings::MarketInstrument;

/// Trait defining the contract for market price lookups.
#[async_trait]
pub trait PriceServiceTrait: Send + Sync {
    /// USD price of one unit of `instrument`.
    async fn fetch_unit_price(&self, instrument: &MarketInstrument) -> Result<PricedValue>;
}
