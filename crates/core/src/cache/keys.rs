use crate::rates::RatePair;

/// Builds the logical keys entries are stored under.
pub struct CacheKey;

impl CacheKey {
    pub fn rate(pair: RatePair) -> String {
        pair.cache_key().to_string()
    }

    pub fn stock(symbol: &str) -> String {
        format!("stock:{}", symbol.trim().to_uppercase())
    }

    pub fn crypto(venue: &str, symbol: &str) -> String {
        format!(
            "crypto:{}:{}",
            venue.trim().to_uppercase(),
            symbol.trim().to_uppercase()
        )
    }
}
