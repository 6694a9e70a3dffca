use std::time::Duration;

/// How long a cached price or rate stays usable.
pub const DEFAULT_PRICE_CACHE_TTL: Duration = Duration::from_secs(600);

/// Upper bound for a single provider call.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(8);

/// Presets a user can keep portfolios under.
pub const MIN_PRESET: u8 = 1;
pub const MAX_PRESET: u8 = 3;

pub const MAX_USERNAME_LEN: usize = 50;
pub const MAX_SYMBOL_LEN: usize = 20;

/// Currency codes the cash algebra understands.
pub const KRW: &str = "KRW";
pub const USD: &str = "USD";
pub const USDT: &str = "USDT";

/// Screener value that marks a holding as cash.
pub const CASH_SCREENER: &str = "cash";
/// Screener value that marks a holding as crypto.
pub const CRYPTO_SCREENER: &str = "crypto";
