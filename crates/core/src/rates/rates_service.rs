use async_trait::async_trait;
use folio_market_data::{IndicatorProvider, Interval, MarketDataError};
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use super::rates_model::{ConversionRates, RatePair};
use super::rates_traits::RateServiceTrait;
use crate::cache::{CacheKey, PriceCache};
use crate::constants::DEFAULT_PROVIDER_TIMEOUT;
use crate::errors::{Error, Result};
use crate::utils::with_timeout;
use crate::valuation::ValuationError;

/// Cache-first conversion rate lookups against an indicator provider.
///
/// There is no stale fallback: once the entry expires a provider failure
/// is a hard `RateUnavailable`.
#[derive(Clone)]
pub struct RateService {
    provider: Arc<dyn IndicatorProvider>,
    cache: Arc<PriceCache>,
    call_timeout: Duration,
}

impl RateService {
    pub fn new(provider: Arc<dyn IndicatorProvider>, cache: Arc<PriceCache>) -> Self {
        Self {
            provider,
            cache,
            call_timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    fn unavailable(pair: RatePair, reason: impl Into<String>) -> Error {
        Error::ValuationFailed(ValuationError::RateUnavailable {
            pair: pair.label().to_string(),
            reason: reason.into(),
        })
    }

    async fn join_rate(pair: RatePair, handle: JoinHandle<Result<f64>>) -> Result<f64> {
        handle.await.unwrap_or_else(|e| {
            let reason = format!("rate task failed: {}", e);
            Err(Self::unavailable(pair, reason))
        })
    }

    fn from_provider_error(&self, pair: RatePair, err: MarketDataError) -> Error {
        let reason = if err.is_timeout() {
            ValuationError::ProviderTimeout {
                provider: self.provider.id().to_string(),
            }
            .to_string()
        } else {
            err.to_string()
        };
        Self::unavailable(pair, reason)
    }
}

#[async_trait]
impl RateServiceTrait for RateService {
    async fn fetch_rate(&self, pair: RatePair) -> Result<f64> {
        let key = CacheKey::rate(pair);
        if let Some(cached) = self.cache.get(&key) {
            debug!("{} served from cache ({:?} old)", pair, cached.age);
            return Ok(cached.value);
        }

        let instrument = pair.instrument();
        let value = with_timeout(
            self.provider.id(),
            self.call_timeout,
            self.provider.last_indicator(&instrument, Interval::OneMinute),
        )
        .await
        .map_err(|e| {
            warn!("Failed to fetch {} from {}: {}", pair, self.provider.id(), e);
            self.from_provider_error(pair, e)
        })?;

        if !value.is_finite() || value <= 0.0 {
            warn!("{} provider returned unusable rate {}", pair, value);
            let reason = format!("unusable rate value {}", value);
            return Err(Self::unavailable(pair, reason));
        }

        self.cache.put(key, value);
        debug!("{} fetched: {}", pair, value);
        Ok(value)
    }

    /// Issues both lookups on their own tasks.
    async fn fetch_rates(&self) -> Result<ConversionRates> {
        let [usd, usdt] = RatePair::ALL.map(|pair| {
            let service = self.clone();
            tokio::spawn(async move { service.fetch_rate(pair).await })
        });

        let (usd_krw, usdt_krw) = futures::try_join!(
            Self::join_rate(RatePair::UsdKrw, usd),
            Self::join_rate(RatePair::UsdtKrw, usdt),
        )?;

        Ok(ConversionRates::new(usd_krw, usdt_krw))
    }
}
