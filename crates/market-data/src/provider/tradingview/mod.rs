//! TradingView scanner indicator provider.
//!
//! Reads the `close` indicator of forex and crypto instruments from the
//! public scanner endpoint:
//! - Forex pairs (e.g. `FX_IDC:USDKRW` under the `forex` screener)
//! - Crypto pairs (e.g. `BITHUMB:USDTKRW`, `BINANCE:BTCUSDT` under `crypto`)

mod models;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, StatusCode};
use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::models::{Instrument, Interval};
use crate::provider::IndicatorProvider;

use models::{ScanRequest, ScanResponse};

const PROVIDER_ID: &str = "TRADINGVIEW";
const DEFAULT_BASE_URL: &str = "https://scanner.tradingview.com";
const USER_AGENT: &str = "tradingview_ta/3.3.0";
const CLOSE_INDICATOR: &str = "close";

/// TradingView scanner provider.
pub struct TradingViewProvider {
    client: reqwest::Client,
    base_url: String,
}

impl TradingViewProvider {
    /// Create a provider whose HTTP requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, MarketDataError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the provider at another scanner host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn scan_url(&self, instrument: &Instrument) -> String {
        format!("{}/{}/scan", self.base_url, instrument.screener.as_str())
    }

    fn indicator_column(interval: Interval) -> String {
        format!("{}{}", CLOSE_INDICATOR, interval.column_suffix())
    }

    /// Pull the single requested indicator out of a scanner response.
    fn extract_indicator(ticker: &str, response: ScanResponse) -> Result<f64, MarketDataError> {
        let row = response
            .data
            .into_iter()
            .find(|row| row.s.eq_ignore_ascii_case(ticker))
            .ok_or_else(|| MarketDataError::SymbolNotFound(ticker.to_string()))?;

        let value = row.d.first().copied().flatten();
        let value = value.ok_or_else(|| MarketDataError::ValidationFailed {
            message: format!("No {} value for {}", CLOSE_INDICATOR, ticker),
        })?;

        if !value.is_finite() {
            return Err(MarketDataError::ValidationFailed {
                message: format!(
                    "Non-finite {} value for {}: {}",
                    CLOSE_INDICATOR, ticker, value
                ),
            });
        }

        Ok(value)
    }
}

#[async_trait]
impl IndicatorProvider for TradingViewProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn last_indicator(
        &self,
        instrument: &Instrument,
        interval: Interval,
    ) -> Result<f64, MarketDataError> {
        let ticker = instrument.ticker();
        let request = ScanRequest::new(ticker.clone(), vec![Self::indicator_column(interval)]);

        debug!("Fetching {} indicator for {} from TradingView", CLOSE_INDICATOR, instrument);

        let response = self
            .client
            .post(self.scan_url(instrument))
            .header(header::CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MarketDataError::Timeout {
                        provider: PROVIDER_ID.to_string(),
                    }
                } else {
                    MarketDataError::Network(e)
                }
            })?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => {
                warn!("TradingView rate limited request for {}", ticker);
                return Err(MarketDataError::RateLimited {
                    provider: PROVIDER_ID.to_string(),
                });
            }
            status if !status.is_success() => {
                return Err(MarketDataError::ProviderError {
                    provider: PROVIDER_ID.to_string(),
                    message: format!("HTTP {} for {}", status, ticker),
                });
            }
            _ => {}
        }

        let body: ScanResponse = response
            .json()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse scanner response: {}", e),
            })?;

        Self::extract_indicator(&ticker, body)
    }
}
