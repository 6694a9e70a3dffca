use std::future::Future;
use std::time::Duration;

use folio_market_data::MarketDataError;

/// Runs a single provider call, giving up after `limit`.
///
/// An expired call surfaces as [`MarketDataError::Timeout`] tagged with the
/// provider id. The abandoned future is dropped; anything it already wrote
/// to the cache stays there.
pub async fn with_timeout<T, F>(
    provider: &str,
    limit: Duration,
    call: F,
) -> Result<T, MarketDataError>
where
    F: Future<Output = Result<T, MarketDataError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(MarketDataError::Timeout {
            provider: provider.to_string(),
        }),
    }
}
