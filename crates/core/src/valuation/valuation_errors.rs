use thiserror::Error;

/// Why a valuation, or one of its lines, could not be priced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValuationError {
    /// A conversion rate could not be obtained. Fatal for the whole report.
    #[error("Conversion rate {pair} unavailable: {reason}")]
    RateUnavailable { pair: String, reason: String },

    /// A single holding could not be priced. The line is zeroed.
    #[error("Price unavailable for {symbol}: {reason}")]
    PriceUnavailable { symbol: String, reason: String },

    #[error("Provider {provider} did not answer in time")]
    ProviderTimeout { provider: String },

    /// Cash in a currency the engine cannot convert.
    #[error("Unsupported cash currency: {symbol}")]
    InvalidHolding { symbol: String },
}
