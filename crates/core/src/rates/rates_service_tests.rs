#[cfg(test)]
mod tests {
    use crate::cache::{CacheKey, ManualClock, PriceCache};
    use crate::errors::Error;
    use crate::rates::{ConversionRates, RatePair, RateService, RateServiceTrait};
    use crate::valuation::ValuationError;
    use async_trait::async_trait;
    use folio_market_data::{IndicatorProvider, Instrument, Interval, MarketDataError};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    // --- Mock IndicatorProvider ---
    #[derive(Clone, Default)]
    struct MockIndicatorProvider {
        values: Arc<Mutex<HashMap<String, f64>>>,
        calls: Arc<Mutex<Vec<(String, Interval)>>>,
        delay: Option<Duration>,
    }

    impl MockIndicatorProvider {
        fn with_rates(usd_krw: f64, usdt_krw: f64) -> Self {
            let provider = Self::default();
            provider.set("FX_IDC:USDKRW", usd_krw);
            provider.set("BITHUMB:USDTKRW", usdt_krw);
            provider
        }

        fn set(&self, ticker: &str, value: f64) {
            self.values
                .lock()
                .unwrap()
                .insert(ticker.to_string(), value);
        }

        fn remove(&self, ticker: &str) {
            self.values.lock().unwrap().remove(ticker);
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl IndicatorProvider for MockIndicatorProvider {
        fn id(&self) -> &'static str {
            "MOCK_TV"
        }

        async fn last_indicator(
            &self,
            instrument: &Instrument,
            interval: Interval,
        ) -> Result<f64, MarketDataError> {
            let ticker = instrument.ticker();
            self.calls.lock().unwrap().push((ticker.clone(), interval));
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            let value = self.values.lock().unwrap().get(&ticker).copied();
            value.ok_or(MarketDataError::SymbolNotFound(ticker))
        }
    }

    fn service_with_clock(
        provider: &MockIndicatorProvider,
    ) -> (RateService, Arc<PriceCache>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let cache = Arc::new(PriceCache::with_clock(
            Duration::from_secs(600),
            clock.clone(),
        ));
        let service = RateService::new(Arc::new(provider.clone()), cache.clone());
        (service, cache, clock)
    }

    fn assert_rate_unavailable(
        result: crate::errors::Result<f64>,
        expected_pair: &str,
    ) -> String {
        match result {
            Err(Error::ValuationFailed(ValuationError::RateUnavailable { pair, reason })) => {
                assert_eq!(pair, expected_pair);
                reason
            }
            other => panic!("expected RateUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_rates_queries_both_pairs_at_one_minute() {
        let provider = MockIndicatorProvider::with_rates(1350.5, 1362.0);
        let (service, cache, _clock) = service_with_clock(&provider);

        let rates = service.fetch_rates().await.unwrap();

        assert_eq!(rates.usd_krw, 1350.5);
        assert_eq!(rates.usdt_krw, 1362.0);
        let mut calls = provider.calls.lock().unwrap().clone();
        calls.sort_by(|a, b| a.0.cmp(&b.0));
        assert_eq!(
            calls,
            vec![
                ("BITHUMB:USDTKRW".to_string(), Interval::OneMinute),
                ("FX_IDC:USDKRW".to_string(), Interval::OneMinute),
            ]
        );
        assert_eq!(cache.get("usd_krw").unwrap().value, 1350.5);
        assert_eq!(cache.get("usdt_krw").unwrap().value, 1362.0);
    }

    #[tokio::test]
    async fn test_cached_rate_is_reused_within_ttl() {
        let provider = MockIndicatorProvider::with_rates(1300.0, 1310.0);
        let (service, _cache, clock) = service_with_clock(&provider);

        assert_eq!(service.fetch_usd_krw().await.unwrap(), 1300.0);
        provider.set("FX_IDC:USDKRW", 1400.0);

        clock.advance(Duration::from_secs(599));
        assert_eq!(service.fetch_usd_krw().await.unwrap(), 1300.0);
        assert_eq!(provider.call_count(), 1);

        clock.advance(Duration::from_secs(2));
        assert_eq!(service.fetch_usd_krw().await.unwrap(), 1400.0);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_provider_failure_is_rate_unavailable() {
        let provider = MockIndicatorProvider::with_rates(1300.0, 1310.0);
        provider.remove("BITHUMB:USDTKRW");
        let (service, _cache, _clock) = service_with_clock(&provider);

        let reason = assert_rate_unavailable(service.fetch_usdt_krw().await, "USDT/KRW");
        assert!(reason.contains("BITHUMB:USDTKRW"));
        assert!(service.fetch_rates().await.is_err());
    }

    #[tokio::test]
    async fn test_expired_rate_is_not_used_as_fallback() {
        let provider = MockIndicatorProvider::with_rates(1300.0, 1310.0);
        let (service, cache, clock) = service_with_clock(&provider);

        service.fetch_usd_krw().await.unwrap();
        provider.remove("FX_IDC:USDKRW");
        clock.advance(Duration::from_secs(601));

        assert_rate_unavailable(service.fetch_usd_krw().await, "USD/KRW");
        assert!(cache.get_stale("usd_krw").is_some());
    }

    #[tokio::test]
    async fn test_non_positive_rate_is_rejected_and_not_cached() {
        let provider = MockIndicatorProvider::with_rates(0.0, f64::NAN);
        let (service, cache, _clock) = service_with_clock(&provider);

        assert_rate_unavailable(service.fetch_usd_krw().await, "USD/KRW");
        assert_rate_unavailable(service.fetch_usdt_krw().await, "USDT/KRW");
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_times_out() {
        let mut provider = MockIndicatorProvider::with_rates(1300.0, 1310.0);
        provider.delay = Some(Duration::from_secs(30));
        let cache = Arc::new(PriceCache::new(Duration::from_secs(600)));
        let service = RateService::new(Arc::new(provider.clone()), cache)
            .with_call_timeout(Duration::from_secs(8));

        let reason = assert_rate_unavailable(service.fetch_usd_krw().await, "USD/KRW");
        assert!(reason.contains("MOCK_TV"));
        assert!(reason.contains("in time"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_rates_issues_both_lookups_together() {
        let mut provider = MockIndicatorProvider::with_rates(1300.0, 1310.0);
        provider.delay = Some(Duration::from_secs(1));
        let (service, _cache, _clock) = service_with_clock(&provider);

        let started = tokio::time::Instant::now();
        let rates = service.fetch_rates().await.unwrap();
        let elapsed = started.elapsed();

        assert_eq!(rates, ConversionRates::new(1300.0, 1310.0));
        assert_eq!(provider.call_count(), 2);
        assert!(elapsed >= Duration::from_secs(1));
        assert!(
            elapsed < Duration::from_secs(2),
            "rate lookups ran one after the other ({:?})",
            elapsed
        );
    }

    #[test]
    fn test_pair_labels() {
        assert_eq!(RatePair::UsdKrw.to_string(), "USD/KRW");
        assert_eq!(RatePair::UsdtKrw.cache_key(), "usdt_krw");
        assert_eq!(CacheKey::rate(RatePair::UsdKrw), "usd_krw");
    }
}
