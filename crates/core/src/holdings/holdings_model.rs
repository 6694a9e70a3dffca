use serde::{Deserialize, Serialize};
use std::fmt;

use crate::cache::CacheKey;
use crate::constants::{CASH_SCREENER, CRYPTO_SCREENER, KRW, USD, USDT};

/// Broad asset class of a holding. Decides how it is priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetCategory {
    Cash,
    Equity,
    Crypto,
}

impl AssetCategory {
    /// Maps a stored screener value to a category.
    ///
    /// `"cash"` and `"crypto"` are matched case-insensitively; every other
    /// screener (`"america"`, `"korea"`, ...) names an equity market.
    pub fn from_screener(screener: &str) -> Self {
        let screener = screener.trim();
        if screener.eq_ignore_ascii_case(CASH_SCREENER) {
            AssetCategory::Cash
        } else if screener.eq_ignore_ascii_case(CRYPTO_SCREENER) {
            AssetCategory::Crypto
        } else {
            AssetCategory::Equity
        }
    }
}

/// One line of a portfolio as the valuation engine sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub quantity: f64,
    pub category: AssetCategory,
    /// Exchange or venue. Only meaningful for crypto.
    pub venue: String,
}

impl Holding {
    pub fn new(
        symbol: impl Into<String>,
        quantity: f64,
        category: AssetCategory,
        venue: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            category,
            venue: venue.into(),
        }
    }

    pub fn cash(symbol: impl Into<String>, quantity: f64) -> Self {
        Self::new(symbol, quantity, AssetCategory::Cash, "")
    }

    pub fn equity(symbol: impl Into<String>, quantity: f64) -> Self {
        Self::new(symbol, quantity, AssetCategory::Equity, "")
    }

    pub fn crypto(symbol: impl Into<String>, quantity: f64, venue: impl Into<String>) -> Self {
        Self::new(symbol, quantity, AssetCategory::Crypto, venue)
    }

    /// Decides how this holding gets a price.
    pub fn pricing_plan(&self) -> PricingPlan {
        match self.category {
            AssetCategory::Cash => PricingPlan::Cash(CashCurrency::parse(&self.symbol)),
            AssetCategory::Equity => PricingPlan::Market(MarketInstrument::Equity {
                symbol: self.symbol.trim().to_string(),
            }),
            AssetCategory::Crypto => PricingPlan::Market(MarketInstrument::Crypto {
                symbol: self.symbol.trim().to_string(),
                venue: self.venue.trim().to_string(),
            }),
        }
    }
}

/// Cash currencies with a known conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CashCurrency {
    Krw,
    Usd,
    Usdt,
    Unsupported(String),
}

impl CashCurrency {
    pub fn parse(symbol: &str) -> Self {
        let symbol = symbol.trim();
        if symbol.eq_ignore_ascii_case(KRW) {
            CashCurrency::Krw
        } else if symbol.eq_ignore_ascii_case(USD) {
            CashCurrency::Usd
        } else if symbol.eq_ignore_ascii_case(USDT) {
            CashCurrency::Usdt
        } else {
            CashCurrency::Unsupported(symbol.to_string())
        }
    }
}

/// A holding that needs a market price.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MarketInstrument {
    Equity { symbol: String },
    Crypto { symbol: String, venue: String },
}

impl MarketInstrument {
    pub fn symbol(&self) -> &str {
        match self {
            MarketInstrument::Equity { symbol } | MarketInstrument::Crypto { symbol, .. } => symbol,
        }
    }

    pub fn cache_key(&self) -> String {
        match self {
            MarketInstrument::Equity { symbol } => CacheKey::stock(symbol),
            MarketInstrument::Crypto { symbol, venue } => CacheKey::crypto(venue, symbol),
        }
    }
}

impl fmt::Display for MarketInstrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketInstrument::Equity { symbol } => write!(f, "{}", symbol),
            MarketInstrument::Crypto { symbol, venue } => write!(f, "{}:{}", venue, symbol),
        }
    }
}

/// Pricing dispatch. Cash is priced algebraically from the conversion
/// rates and never reaches a price provider.
#[derive(Debug, Clone, PartialEq)]
pub enum PricingPlan {
    Cash(CashCurrency),
    Market(MarketInstrument),
}
