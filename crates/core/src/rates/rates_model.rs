use folio_market_data::Instrument;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Conversion rates a valuation was computed with. Both are > 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionRates {
    pub usd_krw: f64,
    pub usdt_krw: f64,
}

impl ConversionRates {
    pub fn new(usd_krw: f64, usdt_krw: f64) -> Self {
        Self { usd_krw, usdt_krw }
    }
}

/// The two pairs every valuation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RatePair {
    UsdKrw,
    UsdtKrw,
}

impl RatePair {
    pub const ALL: [RatePair; 2] = [RatePair::UsdKrw, RatePair::UsdtKrw];

    pub fn cache_key(&self) -> &'static str {
        match self {
            RatePair::UsdKrw => "usd_krw",
            RatePair::UsdtKrw => "usdt_krw",
        }
    }

    /// Where the pair is quoted: interbank forex for USD, Bithumb for USDT.
    pub fn instrument(&self) -> Instrument {
        match self {
            RatePair::UsdKrw => Instrument::forex("USDKRW", "FX_IDC"),
            RatePair::UsdtKrw => Instrument::crypto("USDTKRW", "BITHUMB"),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RatePair::UsdKrw => "USD/KRW",
            RatePair::UsdtKrw => "USDT/KRW",
        }
    }
}

impl fmt::Display for RatePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
