use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Market screener an instrument is listed under.
///
/// Indicator providers partition their universe by screener, so the same
/// symbol can mean different things under `forex` and `crypto`.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Screener {
    Forex,
    Crypto,
    /// A national equity market (e.g. "america", "korea")
    Market(Cow<'static, str>),
}

impl Screener {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Forex => "forex",
            Self::Crypto => "crypto",
            Self::Market(name) => name,
        }
    }
}

impl From<String> for Screener {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "forex" => Self::Forex,
            "crypto" => Self::Crypto,
            other => Self::Market(Cow::Owned(other.to_string())),
        }
    }
}

impl From<Screener> for String {
    fn from(value: Screener) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Screener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Instrument identity as an indicator provider needs it: a symbol, the
/// screener it lives in, and the exchange (venue) that disambiguates it.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Instrument {
    pub symbol: Arc<str>,
    pub screener: Screener,
    pub exchange: Cow<'static, str>,
}

impl Instrument {
    pub fn new(
        symbol: impl Into<Arc<str>>,
        screener: Screener,
        exchange: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            screener,
            exchange: exchange.into(),
        }
    }

    /// Forex pair quoted on the given exchange, e.g. `FX_IDC:USDKRW`.
    pub fn forex(symbol: &'static str, exchange: &'static str) -> Self {
        Self::new(symbol, Screener::Forex, exchange)
    }

    /// Crypto pair quoted on the given exchange, e.g. `BITHUMB:USDTKRW`.
    pub fn crypto(symbol: impl Into<Arc<str>>, exchange: impl Into<Cow<'static, str>>) -> Self {
        Self::new(symbol, Screener::Crypto, exchange)
    }

    /// Exchange-qualified ticker, upper-cased: `EXCHANGE:SYMBOL`.
    pub fn ticker(&self) -> String {
        format!(
            "{}:{}",
            self.exchange.to_uppercase(),
            self.symbol.to_uppercase()
        )
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.ticker(), self.screener)
    }
}
