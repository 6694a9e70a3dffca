//! Time-bounded price cache shared by the rate and price fetchers.

mod clock;
mod keys;
mod price_cache;

pub use clock::{Clock, ManualClock, SystemClock};
pub use keys::CacheKey;
pub use price_cache::{CachedPrice, PriceCache};
