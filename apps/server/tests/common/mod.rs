#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use folio_market_data::{
    EquityPriceProvider, IndicatorProvider, Instrument, Interval, MarketDataError,
};
use folio_server::{api::app_router, build_state_with_providers, config::Config, Providers};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const USD_KRW: f64 = 1300.0;
pub const USDT_KRW: f64 = 1400.0;

pub struct FixedEquities {
    prices: HashMap<String, f64>,
}

#[async_trait]
impl EquityPriceProvider for FixedEquities {
    fn id(&self) -> &'static str {
        "FIXED_EQUITIES"
    }

    async fn latest_price(&self, symbol: &str) -> Result<f64, MarketDataError> {
        self.prices
            .get(symbol)
            .copied()
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))
    }

    async fn daily_close(&self, symbol: &str) -> Result<f64, MarketDataError> {
        self.latest_price(symbol).await
    }
}

pub struct FixedIndicators {
    rates_available: bool,
}

#[async_trait]
impl IndicatorProvider for FixedIndicators {
    fn id(&self) -> &'static str {
        "FIXED_INDICATORS"
    }

    async fn last_indicator(
        &self,
        instrument: &Instrument,
        _interval: Interval,
    ) -> Result<f64, MarketDataError> {
        if !self.rates_available {
            return Err(MarketDataError::ProviderError {
                provider: self.id().to_string(),
                message: "HTTP 503".to_string(),
            });
        }
        match &*instrument.symbol {
            "USDKRW" => Ok(USD_KRW),
            "USDTKRW" => Ok(USDT_KRW),
            "BTCUSDT" => Ok(60_000.0),
            other => Err(MarketDataError::SymbolNotFound(other.to_string())),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    _db_dir: TempDir,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(true).await
}

pub async fn spawn_app_with(rates_available: bool) -> TestApp {
    let db_dir = tempfile::tempdir().unwrap();
    let config = Config {
        db_path: db_dir.path().join("test.db").to_string_lossy().into_owned(),
        jwt_secret: Some(b"integration-test-secret-32-bytes".to_vec()),
        ..Config::default()
    };
    let providers = Providers {
        equities: Arc::new(FixedEquities {
            prices: HashMap::from([("AAPL".to_string(), 200.0)]),
        }),
        indicators: Arc::new(FixedIndicators { rates_available }),
    };
    let state = build_state_with_providers(&config, providers).await.unwrap();
    TestApp {
        router: app_router(state, &config),
        _db_dir: db_dir,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    pub async fn signup(&self, username: &str, password: &str) -> (StatusCode, Value) {
        let body = serde_json::json!({ "username": username, "password": password });
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri("/api/users/signup")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri("/api/token")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(format!(
                    "username={username}&password={password}"
                )))
                .unwrap(),
        )
        .await
    }

    /// Signs up a fresh user and returns a bearer token for it.
    pub async fn token_for(&self, username: &str) -> String {
        let (status, _) = self.signup(username, "hunter22").await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = self.login(username, "hunter22").await;
        assert_eq!(status, StatusCode::OK);
        body["access_token"].as_str().unwrap().to_string()
    }

    pub async fn get_authed(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn post_authed(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}
