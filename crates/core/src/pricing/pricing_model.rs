use serde::{Deserialize, Serialize};

use crate::holdings::MarketInstrument;

/// Where a unit price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSource {
    Live,
    Cached,
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricedValue {
    pub price_usd: f64,
    pub source: PriceSource,
}

impl PricedValue {
    pub fn new(price_usd: f64, source: PriceSource) -> Self {
        Self { price_usd, source }
    }
}

/// Which instruments may be served from an expired cache entry when the
/// provider call fails. Equities always may.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleFallback {
    #[default]
    All,
    EquitiesOnly,
}

impl StaleFallback {
    pub fn covers(&self, instrument: &MarketInstrument) -> bool {
        match instrument {
            MarketInstrument::Equity { .. } => true,
            MarketInstrument::Crypto { .. } => *self == StaleFallback::All,
        }
    }
}
