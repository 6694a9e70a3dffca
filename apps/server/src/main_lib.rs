use std::sync::Arc;

use crate::{auth::AuthManager, auth::random_secret_key, config::Config};
use folio_core::{
    cache::PriceCache,
    portfolio::{PortfolioService, PortfolioServiceTrait},
    pricing::{PriceService, StaleFallback},
    rates::RateService,
    users::{UserService, UserServiceTrait},
    valuation::{ValuationService, ValuationSettings},
};
use folio_market_data::{
    EquityPriceProvider, IndicatorProvider, TradingViewProvider, YahooProvider,
};
use folio_storage_sqlite::{
    create_pool, init, run_migrations, spawn_writer, PortfolioRepository, UserRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub portfolio_service: Arc<dyn PortfolioServiceTrait>,
    pub auth: Arc<AuthManager>,
}

/// External price sources the valuation engine talks to.
pub struct Providers {
    pub equities: Arc<dyn EquityPriceProvider>,
    pub indicators: Arc<dyn IndicatorProvider>,
}

impl Providers {
    pub fn live(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            equities: Arc::new(YahooProvider::new(config.provider_timeout)?),
            indicators: Arc::new(TradingViewProvider::new(config.provider_timeout)?),
        })
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("FOLIO_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let providers = Providers::live(config)?;
    build_state_with_providers(config, providers).await
}

pub async fn build_state_with_providers(
    config: &Config,
    providers: Providers,
) -> anyhow::Result<Arc<AppState>> {
    let db_path = init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = create_pool(&db_path)?;
    run_migrations(&pool)?;
    let writer = spawn_writer(&pool)?;

    let user_repo = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let portfolio_repo = Arc::new(PortfolioRepository::new(pool.clone(), writer));

    let settings = ValuationSettings {
        provider_timeout: config.provider_timeout,
        stale_fallback: StaleFallback::All,
        cache_ttl: config.price_cache_ttl,
    };
    let cache = Arc::new(PriceCache::new(settings.cache_ttl));
    let rate_service = RateService::new(providers.indicators.clone(), cache.clone())
        .with_call_timeout(settings.provider_timeout);
    let price_service = PriceService::new(providers.equities, providers.indicators, cache)
        .with_call_timeout(settings.provider_timeout)
        .with_stale_fallback(settings.stale_fallback);
    let valuation_service = Arc::new(ValuationService::new(
        Arc::new(rate_service),
        Arc::new(price_service),
    ));

    let user_service = Arc::new(UserService::new(user_repo));
    let portfolio_service = Arc::new(PortfolioService::new(portfolio_repo, valuation_service));

    let jwt_secret = match &config.jwt_secret {
        Some(secret) => secret.clone(),
        None => {
            tracing::warn!(
                "FOLIO_JWT_SECRET is not set; using a random key, tokens will not survive a restart"
            );
            random_secret_key()
        }
    };
    let auth = Arc::new(AuthManager::new(&jwt_secret, config.token_ttl));

    Ok(Arc::new(AppState {
        user_service,
        portfolio_service,
        auth,
    }))
}
