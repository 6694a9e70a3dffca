use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use folio_core::{
    errors::Error as CoreError,
    portfolio::{NewPortfolioAsset, PortfolioAsset, PortfolioValuation, Preset},
    valuation::{LineStatus, ValuationLine},
};
use serde::{Deserialize, Serialize};

use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState};

#[derive(Deserialize, Default)]
pub struct PresetQuery {
    pub preset: Option<i64>,
}

impl PresetQuery {
    fn preset(&self) -> Result<Preset, CoreError> {
        Ok(Preset::new(self.preset.unwrap_or(1))?)
    }
}

#[derive(Deserialize)]
pub struct SavePortfolioRequest {
    pub assets: Vec<NewPortfolioAsset>,
}

#[derive(Serialize)]
pub struct AssetResponse {
    pub id: i32,
    pub owner_id: i32,
    pub preset: Preset,
    pub symbol: String,
    pub quantity: f64,
    pub screener: String,
    pub exchange: String,
}

impl From<PortfolioAsset> for AssetResponse {
    fn from(asset: PortfolioAsset) -> Self {
        Self {
            id: asset.id,
            owner_id: asset.owner_id,
            preset: asset.preset,
            symbol: asset.symbol,
            quantity: asset.quantity,
            screener: asset.screener,
            exchange: asset.exchange,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ValuedAssetResponse {
    pub symbol: String,
    pub quantity: f64,
    pub screener: String,
    pub exchange: String,
    pub usd_price: f64,
    pub krw_price: f64,
    pub total_usd: f64,
    pub total_krw: f64,
    pub status: LineStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValuedAssetResponse {
    fn new(asset: PortfolioAsset, line: ValuationLine) -> Self {
        Self {
            symbol: asset.symbol,
            quantity: asset.quantity,
            screener: asset.screener,
            exchange: asset.exchange,
            usd_price: line.unit_price_usd,
            krw_price: line.unit_price_krw,
            total_usd: line.total_usd,
            total_krw: line.total_krw,
            status: line.status,
            error: line.error,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct PortfolioValueResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    pub portfolio: Vec<ValuedAssetResponse>,
    pub total_usd: f64,
    pub total_krw: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usd_krw_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usdt_krw_rate: Option<f64>,
}

impl From<PortfolioValuation> for PortfolioValueResponse {
    fn from(valuation: PortfolioValuation) -> Self {
        let PortfolioValuation { assets, report } = valuation;
        let rates = report.rates_used;
        let portfolio = assets
            .into_iter()
            .zip(report.lines)
            .map(|(asset, line)| ValuedAssetResponse::new(asset, line))
            .collect();

        Self {
            success: rates.map(|_| true),
            portfolio,
            total_usd: report.total_usd,
            total_krw: report.total_krw,
            usd_krw_rate: rates.map(|r| r.usd_krw),
            usdt_krw_rate: rates.map(|r| r.usdt_krw),
        }
    }
}

#[derive(Serialize)]
struct ValuationFailedBody {
    success: bool,
    error: String,
}

async fn get_portfolio(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<PresetQuery>,
) -> ApiResult<Json<Vec<AssetResponse>>> {
    let preset = query.preset()?;
    let assets = state.portfolio_service.get_portfolio(user.id, preset)?;
    Ok(Json(assets.into_iter().map(AssetResponse::from).collect()))
}

async fn save_portfolio(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<PresetQuery>,
    Json(payload): Json<SavePortfolioRequest>,
) -> ApiResult<StatusCode> {
    let preset = query.preset()?;
    state
        .portfolio_service
        .save_portfolio(user.id, preset, payload.assets)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_portfolio_value(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<PresetQuery>,
) -> ApiResult<Response> {
    let preset = query.preset()?;
    match state.portfolio_service.value_portfolio(user.id, preset).await {
        Ok(valuation) => {
            let body = PortfolioValueResponse::from(valuation);
            Ok(Json(body).into_response())
        }
        Err(CoreError::ValuationFailed(e)) => {
            tracing::error!("Valuation for user {} failed: {}", user.id, e);
            let body = ValuationFailedBody {
                success: false,
                error: e.to_string(),
            };
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            Ok((status, Json(body)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/portfolio", get(get_portfolio).post(save_portfolio))
        .route("/portfolio/value", get(get_portfolio_value))
}
