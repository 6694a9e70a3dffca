use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{DEFAULT_PRICE_CACHE_TTL, DEFAULT_PROVIDER_TIMEOUT};
use crate::holdings::Holding;
use crate::pricing::{PriceSource, StaleFallback};
use crate::rates::ConversionRates;

/// How a line got its numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStatus {
    /// Fresh value from a provider.
    Priced,
    /// Fresh value from the cache.
    Cached,
    /// Expired cache value used after the provider failed.
    Stale,
    PriceUnavailable,
    UnsupportedCash,
}

impl From<PriceSource> for LineStatus {
    fn from(source: PriceSource) -> Self {
        match source {
            PriceSource::Live => LineStatus::Priced,
            PriceSource::Cached => LineStatus::Cached,
            PriceSource::Stale => LineStatus::Stale,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationLine {
    pub holding: Holding,
    pub unit_price_usd: f64,
    pub unit_price_krw: f64,
    pub total_usd: f64,
    pub total_krw: f64,
    pub status: LineStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValuationLine {
    /// A line with every amount set to zero.
    pub fn zeroed(holding: Holding, status: LineStatus, error: impl Into<String>) -> Self {
        Self {
            holding,
            unit_price_usd: 0.0,
            unit_price_krw: 0.0,
            total_usd: 0.0,
            total_krw: 0.0,
            status,
            error: Some(error.into()),
        }
    }

    pub fn is_priced(&self) -> bool {
        !matches!(
            self.status,
            LineStatus::PriceUnavailable | LineStatus::UnsupportedCash
        )
    }
}

/// Lines in input order plus their sums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationReport {
    pub lines: Vec<ValuationLine>,
    pub total_usd: f64,
    pub total_krw: f64,
    /// `None` when no rates were needed (empty portfolio).
    pub rates_used: Option<ConversionRates>,
}

impl ValuationReport {
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            total_usd: 0.0,
            total_krw: 0.0,
            rates_used: None,
        }
    }

    pub fn from_lines(lines: Vec<ValuationLine>, rates: ConversionRates) -> Self {
        let total_usd = lines.iter().map(|l| l.total_usd).sum();
        let total_krw = lines.iter().map(|l| l.total_krw).sum();
        Self {
            lines,
            total_usd,
            total_krw,
            rates_used: Some(rates),
        }
    }

    pub fn failed_lines(&self) -> impl Iterator<Item = &ValuationLine> {
        self.lines.iter().filter(|l| !l.is_priced())
    }
}

/// Engine tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValuationSettings {
    /// Upper bound for one provider call.
    pub provider_timeout: Duration,
    pub stale_fallback: StaleFallback,
    pub cache_ttl: Duration,
}

impl Default for ValuationSettings {
    fn default() -> Self {
        Self {
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            stale_fallback: StaleFallback::default(),
            cache_ttl: DEFAULT_PRICE_CACHE_TTL,
        }
    }
}
