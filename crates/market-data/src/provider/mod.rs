//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `EquityPriceProvider` and `IndicatorProvider` traits
//! - Concrete implementations (Yahoo Finance, TradingView scanner)
//!
//! Providers only translate a lookup into one network exchange and parse the
//! answer. They never cache and never retry.

mod traits;

pub mod tradingview;
pub mod yahoo;

pub use traits::{EquityPriceProvider, IndicatorProvider};
