use async_trait::async_trait;
use folio_market_data::{
    EquityPriceProvider, IndicatorProvider, Instrument, Interval, MarketDataError,
};
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

use super::pricing_model::{PriceSource, PricedValue, StaleFallback};
use super::pricing_traits::PriceServiceTrait;
use crate::cache::PriceCache;
use crate::constants::DEFAULT_PROVIDER_TIMEOUT;
use crate::errors::{Error, Result};
use crate::holdings::MarketInstrument;
use crate::utils::with_timeout;
use crate::valuation::ValuationError;

fn usable(provider: &str, value: f64) -> std::result::Result<f64, MarketDataError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(MarketDataError::ValidationFailed {
            message: format!("{} returned unusable price {}", provider, value),
        })
    }
}

/// Cache-first unit prices for market instruments.
///
/// Equities come from the equity provider (latest price, then daily close).
/// Crypto comes from the indicator provider's 1-minute close on the
/// holding's venue. When every live source fails, the last cached value is
/// used regardless of age unless stale fallback is disabled.
#[derive(Clone)]
pub struct PriceService {
    equities: Arc<dyn EquityPriceProvider>,
    crypto: Arc<dyn IndicatorProvider>,
    cache: Arc<PriceCache>,
    call_timeout: Duration,
    stale_fallback: StaleFallback,
}

impl PriceService {
    pub fn new(
        equities: Arc<dyn EquityPriceProvider>,
        crypto: Arc<dyn IndicatorProvider>,
        cache: Arc<PriceCache>,
    ) -> Self {
        Self {
            equities,
            crypto,
            cache,
            call_timeout: DEFAULT_PROVIDER_TIMEOUT,
            stale_fallback: StaleFallback::default(),
        }
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn with_stale_fallback(mut self, stale_fallback: StaleFallback) -> Self {
        self.stale_fallback = stale_fallback;
        self
    }

    async fn fetch_equity(&self, symbol: &str) -> std::result::Result<f64, MarketDataError> {
        let provider = self.equities.id();
        let latest = with_timeout(
            provider,
            self.call_timeout,
            self.equities.latest_price(symbol),
        )
        .await
        .and_then(|v| usable(provider, v));

        match latest {
            Ok(price) => Ok(price),
            Err(e) => {
                debug!(
                    "Latest price for {} failed ({}), trying daily close",
                    symbol, e
                );
                with_timeout(
                    provider,
                    self.call_timeout,
                    self.equities.daily_close(symbol),
                )
                .await
                .and_then(|v| usable(provider, v))
            }
        }
    }

    async fn fetch_crypto(
        &self,
        symbol: &str,
        venue: &str,
    ) -> std::result::Result<f64, MarketDataError> {
        let provider = self.crypto.id();
        let instrument = Instrument::crypto(symbol, venue.to_string());
        with_timeout(
            provider,
            self.call_timeout,
            self.crypto.last_indicator(&instrument, Interval::OneMinute),
        )
        .await
        .and_then(|v| usable(provider, v))
    }

    fn unavailable(&self, instrument: &MarketInstrument, err: MarketDataError) -> Error {
        let reason = if err.is_timeout() {
            let provider = match instrument {
                MarketInstrument::Equity { .. } => self.equities.id(),
                MarketInstrument::Crypto { .. } => self.crypto.id(),
            };
            ValuationError::ProviderTimeout {
                provider: provider.to_string(),
            }
            .to_string()
        } else {
            err.to_string()
        };
        Error::ValuationFailed(ValuationError::PriceUnavailable {
            symbol: instrument.symbol().to_string(),
            reason,
        })
    }
}

#[async_trait]
impl PriceServiceTrait for PriceService {
    async fn fetch_unit_price(&self, instrument: &MarketInstrument) -> Result<PricedValue> {
        let key = instrument.cache_key();
        if let Some(cached) = self.cache.get(&key) {
            debug!("{} served from cache ({:?} old)", instrument, cached.age);
            return Ok(PricedValue::new(cached.value, PriceSource::Cached));
        }

        let fetched = match instrument {
            MarketInstrument::Equity { symbol } => self.fetch_equity(symbol).await,
            MarketInstrument::Crypto { symbol, venue } => self.fetch_crypto(symbol, venue).await,
        };

        match fetched {
            Ok(price) => {
                self.cache.put(key, price);
                Ok(PricedValue::new(price, PriceSource::Live))
            }
            Err(e) => {
                if self.stale_fallback.covers(instrument) {
                    if let Some(stale) = self.cache.get_stale(&key) {
                        warn!(
                            "Pricing {} failed ({}), using cached value from {:?} ago",
                            instrument, e, stale.age
                        );
                        return Ok(PricedValue::new(stale.value, PriceSource::Stale));
                    }
                }
                warn!("Pricing {} failed: {}", instrument, e);
                Err(self.unavailable(instrument, e))
            }
        }
    }
}
