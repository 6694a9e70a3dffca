#[cfg(test)]
mod tests {
    use crate::cache::PriceCache;
    use crate::errors::{Error, Result};
    use crate::holdings::{Holding, MarketInstrument};
    use crate::pricing::{PriceService, PriceServiceTrait, PriceSource, PricedValue};
    use crate::rates::{ConversionRates, RatePair, RateService, RateServiceTrait};
    use crate::valuation::{LineStatus, ValuationError, ValuationService, ValuationServiceTrait};
    use async_trait::async_trait;
    use folio_market_data::{
        EquityPriceProvider, IndicatorProvider, Instrument, Interval, MarketDataError,
    };
    use proptest::prelude::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    // --- Mock RateService ---
    struct MockRateService {
        rates: Option<ConversionRates>,
        calls: AtomicUsize,
    }

    impl MockRateService {
        fn new(usd_krw: f64, usdt_krw: f64) -> Self {
            Self {
                rates: Some(ConversionRates::new(usd_krw, usdt_krw)),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                rates: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RateServiceTrait for MockRateService {
        async fn fetch_rate(&self, pair: RatePair) -> Result<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match (self.rates, pair) {
                (Some(r), RatePair::UsdKrw) => Ok(r.usd_krw),
                (Some(r), RatePair::UsdtKrw) => Ok(r.usdt_krw),
                (None, pair) => Err(Error::ValuationFailed(ValuationError::RateUnavailable {
                    pair: pair.label().to_string(),
                    reason: "provider down".to_string(),
                })),
            }
        }
    }

    // --- Mock PriceService ---
    #[derive(Default)]
    struct MockPriceService {
        prices: HashMap<String, f64>,
        delays_ms: HashMap<String, u64>,
        panic_on: Option<String>,
        calls: AtomicUsize,
    }

    impl MockPriceService {
        fn with_prices(prices: &[(&str, f64)]) -> Self {
            Self {
                prices: prices.iter().map(|(s, p)| (s.to_string(), *p)).collect(),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl PriceServiceTrait for MockPriceService {
        async fn fetch_unit_price(&self, instrument: &MarketInstrument) -> Result<PricedValue> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let symbol = instrument.symbol();
            if let Some(delay) = self.delays_ms.get(symbol) {
                tokio::time::sleep(Duration::from_millis(*delay)).await;
            }
            if self.panic_on.as_deref() == Some(symbol) {
                panic!("provider blew up");
            }
            self.prices
                .get(symbol)
                .map(|p| PricedValue::new(*p, PriceSource::Live))
                .ok_or_else(|| {
                    Error::ValuationFailed(ValuationError::PriceUnavailable {
                        symbol: symbol.to_string(),
                        reason: "not listed".to_string(),
                    })
                })
        }
    }

    fn service(rates: &Arc<MockRateService>, prices: &Arc<MockPriceService>) -> ValuationService {
        ValuationService::new(rates.clone(), prices.clone())
    }

    #[tokio::test]
    async fn test_cash_algebra() {
        let rates = Arc::new(MockRateService::new(1300.0, 1300.0));
        let prices = Arc::new(MockPriceService::default());
        let holdings = vec![
            Holding::cash("KRW", 130_000.0),
            Holding::cash("USD", 100.0),
            Holding::cash("usdt", 50.0),
        ];

        let report = service(&rates, &prices).value(&holdings).await.unwrap();

        assert_eq!(report.total_usd, 250.0);
        assert_eq!(report.total_krw, 325_000.0);
        assert_eq!(report.lines[0].total_usd, 100.0);
        assert_eq!(report.lines[0].unit_price_krw, 1.0);
        assert_eq!(report.lines[1].total_krw, 130_000.0);
        assert_eq!(report.lines[2].unit_price_krw, 1300.0);
        assert!(report.lines.iter().all(|l| l.status == LineStatus::Priced));
        assert_eq!(
            report.rates_used,
            Some(ConversionRates::new(1300.0, 1300.0))
        );
        assert_eq!(prices.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_portfolio_contacts_nobody() {
        let rates = Arc::new(MockRateService::new(1300.0, 1300.0));
        let prices = Arc::new(MockPriceService::default());

        let report = service(&rates, &prices).value(&[]).await.unwrap();

        assert!(report.lines.is_empty());
        assert_eq!(report.total_usd, 0.0);
        assert_eq!(report.total_krw, 0.0);
        assert!(report.rates_used.is_none());
        assert_eq!(rates.calls.load(Ordering::SeqCst), 0);
        assert_eq!(prices.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rate_failure_fails_fast() {
        let rates = Arc::new(MockRateService::failing());
        let prices = Arc::new(MockPriceService::with_prices(&[("AAPL", 190.0)]));
        let holdings = vec![Holding::equity("AAPL", 3.0), Holding::cash("USD", 10.0)];

        let err = service(&rates, &prices).value(&holdings).await.unwrap_err();

        assert!(matches!(
            err,
            Error::ValuationFailed(ValuationError::RateUnavailable { .. })
        ));
        assert_eq!(prices.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_partial_failure_is_isolated() {
        let rates = Arc::new(MockRateService::new(1300.0, 1350.0));
        let prices = Arc::new(MockPriceService::with_prices(&[
            ("AAPL", 200.0),
            ("BTCUSDT", 60_000.0),
        ]));
        let holdings = vec![
            Holding::equity("AAPL", 10.0),
            Holding::equity("DELISTED", 5.0),
            Holding::crypto("BTCUSDT", 0.5, "BINANCE"),
        ];

        let report = service(&rates, &prices).value(&holdings).await.unwrap();

        assert_eq!(report.lines.len(), 3);
        let failed = &report.lines[1];
        assert_eq!(failed.holding.symbol, "DELISTED");
        assert_eq!(failed.status, LineStatus::PriceUnavailable);
        assert_eq!(failed.total_usd, 0.0);
        assert_eq!(failed.total_krw, 0.0);
        assert!(failed.error.as_deref().unwrap().contains("DELISTED"));

        let stock = &report.lines[0];
        assert_eq!(stock.total_usd, 2000.0);
        assert_eq!(stock.unit_price_krw, 260_000.0);

        let coin = &report.lines[2];
        assert_eq!(coin.unit_price_krw, 60_000.0 * 1350.0);
        assert_eq!(coin.total_usd, 30_000.0);

        assert_eq!(report.total_usd, 32_000.0);
        assert_eq!(report.total_krw, 2_000.0 * 1300.0 + 30_000.0 * 1350.0);
        assert_eq!(report.failed_lines().count(), 1);
    }

    #[tokio::test]
    async fn test_panicking_pricing_task_flags_its_line() {
        let rates = Arc::new(MockRateService::new(1300.0, 1300.0));
        let prices = Arc::new(MockPriceService {
            panic_on: Some("BOOM".to_string()),
            ..MockPriceService::with_prices(&[("AAPL", 100.0)])
        });
        let holdings = vec![Holding::equity("BOOM", 1.0), Holding::equity("AAPL", 1.0)];

        let report = service(&rates, &prices).value(&holdings).await.unwrap();

        assert_eq!(report.lines[0].status, LineStatus::PriceUnavailable);
        assert!(report.lines[0]
            .error
            .as_deref()
            .unwrap()
            .contains("pricing task failed"));
        assert_eq!(report.lines[1].status, LineStatus::Priced);
        assert_eq!(report.total_usd, 100.0);
    }

    #[tokio::test]
    async fn test_unsupported_cash_is_a_flagged_zero_line() {
        let rates = Arc::new(MockRateService::new(1300.0, 1300.0));
        let prices = Arc::new(MockPriceService::default());
        let holdings = vec![Holding::cash("EUR", 500.0), Holding::cash("USD", 1.0)];

        let report = service(&rates, &prices).value(&holdings).await.unwrap();

        assert_eq!(report.lines[0].status, LineStatus::UnsupportedCash);
        assert_eq!(report.lines[0].total_krw, 0.0);
        assert_eq!(report.total_usd, 1.0);
        assert_eq!(report.total_krw, 1300.0);
    }

    // --- Providers for end-to-end engine tests ---
    #[derive(Default)]
    struct CountingIndicators {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl IndicatorProvider for CountingIndicators {
        fn id(&self) -> &'static str {
            "COUNTING_TV"
        }

        async fn last_indicator(
            &self,
            instrument: &Instrument,
            _interval: Interval,
        ) -> std::result::Result<f64, MarketDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match instrument.ticker().as_str() {
                "FX_IDC:USDKRW" => Ok(1333.3),
                "BITHUMB:USDTKRW" => Ok(1341.7),
                "UPBIT:ETHUSDT" => Ok(3012.45),
                other => Err(MarketDataError::SymbolNotFound(other.to_string())),
            }
        }
    }

    #[derive(Default)]
    struct CountingEquities {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl EquityPriceProvider for CountingEquities {
        fn id(&self) -> &'static str {
            "COUNTING_EQUITY"
        }

        async fn latest_price(&self, symbol: &str) -> std::result::Result<f64, MarketDataError> {
            self.calls.lock().unwrap().push(symbol.to_string());
            Ok(123.456)
        }

        async fn daily_close(&self, symbol: &str) -> std::result::Result<f64, MarketDataError> {
            Err(MarketDataError::SymbolNotFound(symbol.to_string()))
        }
    }

    #[tokio::test]
    async fn test_repeat_valuation_within_ttl_is_identical() {
        let indicators = Arc::new(CountingIndicators::default());
        let equities = Arc::new(CountingEquities::default());
        let cache = Arc::new(PriceCache::new(Duration::from_secs(600)));
        let rates = RateService::new(indicators.clone(), cache.clone());
        let prices = PriceService::new(equities.clone(), indicators.clone(), cache);
        let service = ValuationService::new(Arc::new(rates), Arc::new(prices));
        let holdings = vec![
            Holding::equity("VOO", 7.25),
            Holding::crypto("ETHUSDT", 1.1, "UPBIT"),
            Holding::cash("KRW", 987_654.0),
        ];

        let first = service.value(&holdings).await.unwrap();
        let calls_after_first = indicators.calls.load(Ordering::SeqCst);
        let second = service.value(&holdings).await.unwrap();

        assert_eq!(first.total_usd.to_bits(), second.total_usd.to_bits());
        assert_eq!(first.total_krw.to_bits(), second.total_krw.to_bits());
        assert_eq!(indicators.calls.load(Ordering::SeqCst), calls_after_first);
        assert_eq!(equities.calls.lock().unwrap().len(), 1);
        assert_eq!(first.lines[0].status, LineStatus::Priced);
        assert_eq!(second.lines[0].status, LineStatus::Cached);
        assert_eq!(second.lines[1].status, LineStatus::Cached);
    }

    #[tokio::test(start_paused = true)]
    async fn test_holdings_are_priced_concurrently() {
        let mut mock = MockPriceService::default();
        let mut holdings = Vec::new();
        for i in 0..8 {
            let symbol = format!("SLOW{}", i);
            mock.prices.insert(symbol.clone(), 10.0);
            mock.delays_ms.insert(symbol.clone(), 1_000);
            holdings.push(Holding::equity(symbol, 1.0));
        }
        let rates = Arc::new(MockRateService::new(1300.0, 1300.0));
        let prices = Arc::new(mock);

        let started = tokio::time::Instant::now();
        let report = service(&rates, &prices).value(&holdings).await.unwrap();
        let elapsed = started.elapsed();

        assert_eq!(prices.calls.load(Ordering::SeqCst), 8);
        assert_eq!(report.total_usd, 80.0);
        assert!(elapsed >= Duration::from_secs(1));
        assert!(
            elapsed < Duration::from_secs(2),
            "holdings were priced one after the other ({:?})",
            elapsed
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_lines_follow_input_order(delays in prop::collection::vec(0u64..200, 1..12)) {
            let symbols: Vec<String> = (0..delays.len()).map(|i| format!("SYM{}", i)).collect();
            let mut mock = MockPriceService::default();
            for (i, (symbol, delay)) in symbols.iter().zip(&delays).enumerate() {
                mock.prices.insert(symbol.clone(), (i + 1) as f64);
                mock.delays_ms.insert(symbol.clone(), *delay);
            }
            let holdings: Vec<Holding> = symbols
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    if i % 3 == 2 {
                        Holding::crypto(s.clone(), 1.0, "BINANCE")
                    } else {
                        Holding::equity(s.clone(), 1.0)
                    }
                })
                .collect();
            let rates = Arc::new(MockRateService::new(1300.0, 1300.0));
            let prices = Arc::new(mock);

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .start_paused(true)
                .build()
                .unwrap();
            let report = runtime
                .block_on(service(&rates, &prices).value(&holdings))
                .unwrap();

            prop_assert_eq!(report.lines.len(), holdings.len());
            for (i, line) in report.lines.iter().enumerate() {
                prop_assert_eq!(&line.holding.symbol, &holdings[i].symbol);
                prop_assert_eq!(line.unit_price_usd, (i + 1) as f64);
            }
            let sum: f64 = report.lines.iter().map(|l| l.total_usd).sum();
            prop_assert_eq!(report.total_usd, sum);
        }
    }
}
