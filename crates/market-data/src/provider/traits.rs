//! Market data provider trait definitions.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{Instrument, Interval};

/// Source of equity prices.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use folio_market_data::{EquityPriceProvider, MarketDataError};
///
/// struct FixedPrice(f64);
///
/// #[async_trait]
/// impl EquityPriceProvider for FixedPrice {
///     fn id(&self) -> &'static str {
///         "FIXED"
///     }
///
///     async fn latest_price(&self, _symbol: &str) -> Result<f64, MarketDataError> {
///         Ok(self.0)
///     }
///
///     async fn daily_close(&self, _symbol: &str) -> Result<f64, MarketDataError> {
///         Ok(self.0)
///     }
/// }
/// ```
#[async_trait]
pub trait EquityPriceProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs and errors.
    fn id(&self) -> &'static str;

    /// Latest regular-market price for the symbol.
    async fn latest_price(&self, symbol: &str) -> Result<f64, MarketDataError>;

    /// Close of the most recent daily bar for the symbol.
    async fn daily_close(&self, symbol: &str) -> Result<f64, MarketDataError>;
}

/// Source of technical-indicator snapshots for forex and crypto instruments.
#[async_trait]
pub trait IndicatorProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs and errors.
    fn id(&self) -> &'static str;

    /// The last close indicator of `instrument` sampled at `interval`.
    async fn last_indicator(
        &self,
        instrument: &Instrument,
        interval: Interval,
    ) -> Result<f64, MarketDataError>;
}
