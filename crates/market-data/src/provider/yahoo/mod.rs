//! Yahoo Finance equity price provider.
//!
//! Two lookups, matching the two steps of an equity price fetch:
//! - latest regular-market price, from the quoteSummary `price` module
//! - most recent daily close, from the chart API via `yahoo_finance_api`

mod models;

use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use lazy_static::lazy_static;
use reqwest::header;
use tracing::{debug, warn};
use urlencoding::encode;
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::provider::EquityPriceProvider;

use models::YahooQuoteSummaryResponse;

const PROVIDER_ID: &str = "YAHOO";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

// ============================================================================
// Crumb/Cookie Authentication
// ============================================================================

/// Cached Yahoo authentication data
#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

lazy_static! {
    /// Global cache for Yahoo authentication crumb
    static ref YAHOO_CRUMB: RwLock<Option<CrumbData>> = RwLock::default();
}

fn provider_error(message: impl Into<String>) -> MarketDataError {
    MarketDataError::ProviderError {
        provider: PROVIDER_ID.to_string(),
        message: message.into(),
    }
}

fn request_error(context: &str, e: reqwest::Error) -> MarketDataError {
    if e.is_timeout() {
        MarketDataError::Timeout {
            provider: PROVIDER_ID.to_string(),
        }
    } else {
        provider_error(format!("{}: {}", context, e))
    }
}

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance equity price provider.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
    client: reqwest::Client,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider whose HTTP requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, MarketDataError> {
        let connector = yahoo::YahooConnector::new()
            .map_err(|e| provider_error(format!("Failed to initialize Yahoo connector: {}", e)))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| provider_error(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { connector, client })
    }

    // ========================================================================
    // Crumb/Cookie Authentication
    // ========================================================================

    /// Ensure we have a valid Yahoo authentication crumb.
    async fn ensure_crumb(&self) -> Result<CrumbData, MarketDataError> {
        {
            let guard = YAHOO_CRUMB.read().unwrap_or_else(|p| p.into_inner());
            if let Some(crumb) = guard.as_ref() {
                return Ok(crumb.clone());
            }
        }

        self.fetch_crumb().await
    }

    /// Fetch a new Yahoo authentication crumb.
    async fn fetch_crumb(&self) -> Result<CrumbData, MarketDataError> {
        // Step 1: Get cookie from fc.yahoo.com
        let response = self
            .client
            .get("https://fc.yahoo.com")
            .send()
            .await
            .map_err(|e| request_error("Failed to get cookie", e))?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| provider_error("Failed to parse Yahoo cookie"))?;

        // Step 2: Get crumb using cookie
        let crumb = self
            .client
            .get("https://query1.finance.yahoo.com/v1/test/getcrumb")
            .header(header::USER_AGENT, BROWSER_USER_AGENT)
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .map_err(|e| request_error("Failed to get crumb", e))?
            .text()
            .await
            .map_err(|e| request_error("Failed to read crumb", e))?;

        let crumb_data = CrumbData { cookie, crumb };

        let mut guard = YAHOO_CRUMB.write().unwrap_or_else(|p| p.into_inner());
        *guard = Some(crumb_data.clone());

        Ok(crumb_data)
    }

    /// Clear the cached crumb (used when authentication fails)
    fn clear_crumb(&self) {
        let mut guard = YAHOO_CRUMB.write().unwrap_or_else(|p| p.into_inner());
        *guard = None;
    }

    // ========================================================================
    // Price Fetching
    // ========================================================================

    /// Regular-market price from the quoteSummary API.
    async fn fetch_regular_market_price(&self, symbol: &str) -> Result<f64, MarketDataError> {
        let crumb = self.ensure_crumb().await?;

        let url = format!(
            "https://query1.finance.yahoo.com/v10/finance/quoteSummary/{}?modules=price&crumb={}",
            encode(symbol),
            encode(&crumb.crumb)
        );

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, BROWSER_USER_AGENT)
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await
            .map_err(|e| request_error("Quote request failed", e))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            self.clear_crumb();
            return Err(provider_error("Yahoo authentication expired"));
        }
        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: PROVIDER_ID.to_string(),
            });
        }

        let data: YahooQuoteSummaryResponse = response
            .json()
            .await
            .map_err(|e| provider_error(format!("Failed to parse quote response: {}", e)))?;

        extract_regular_market_price(symbol, data)
    }
}

/// Pull a usable regular-market price out of a quoteSummary response.
fn extract_regular_market_price(
    symbol: &str,
    data: YahooQuoteSummaryResponse,
) -> Result<f64, MarketDataError> {
    let price = data
        .quote_summary
        .result
        .into_iter()
        .next()
        .and_then(|r| r.price)
        .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;

    if let Some(currency) = price.currency.as_deref() {
        if !currency.eq_ignore_ascii_case("USD") {
            warn!("{} is quoted in {}, not USD", symbol, currency);
        }
    }

    price
        .regular_market_price
        .and_then(|p| p.raw)
        .filter(|p| p.is_finite() && *p > 0.0)
        .ok_or_else(|| MarketDataError::ValidationFailed {
            message: format!("No valid regular market price for {}", symbol),
        })
}

// ============================================================================
// EquityPriceProvider Implementation
// ============================================================================

#[async_trait]
impl EquityPriceProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn latest_price(&self, symbol: &str) -> Result<f64, MarketDataError> {
        debug!("Fetching regular market price for {} from Yahoo", symbol);
        self.fetch_regular_market_price(symbol).await
    }

    async fn daily_close(&self, symbol: &str) -> Result<f64, MarketDataError> {
        debug!("Fetching latest daily close for {} from Yahoo", symbol);

        let response = self
            .connector
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| {
                if matches!(e, yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult) {
                    MarketDataError::SymbolNotFound(symbol.to_string())
                } else {
                    provider_error(e.to_string())
                }
            })?;

        let quote = response.last_quote().map_err(|e| {
            warn!("No quotes returned for {}: {}", symbol, e);
            MarketDataError::SymbolNotFound(symbol.to_string())
        })?;

        if !quote.close.is_finite() || quote.close <= 0.0 {
            return Err(MarketDataError::ValidationFailed {
                message: format!("Invalid close price {} for {}", quote.close, symbol),
            });
        }

        Ok(quote.close)
    }
}

// ============================================================================
// Tests
// ============================================================================
