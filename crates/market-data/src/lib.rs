//! Folio Market Data Crate
//!
//! Provider adapters for the prices the valuation engine needs:
//! - Equity prices (latest regular-market price, most recent daily close)
//! - Technical-indicator snapshots for forex and crypto instruments,
//!   used both for conversion rates (USD/KRW, USDT/KRW) and crypto prices
//!
//! # Architecture
//!
//! ```text
//! +------------------+        +----------------------+
//! |   folio-core     | -----> | EquityPriceProvider  |  (Yahoo Finance)
//! |  (rates/pricing) |        +----------------------+
//! |                  |        +----------------------+
//! |                  | -----> |  IndicatorProvider   |  (TradingView scanner)
//! +------------------+        +----------------------+
//! ```
//!
//! Providers are stateless from the caller's point of view. Caching,
//! timeouts and fallbacks are owned by the caller.

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{Instrument, Interval, Screener};
pub use provider::tradingview::TradingViewProvider;
pub use provider::yahoo::YahooProvider;
pub use provider::{EquityPriceProvider, IndicatorProvider};
