//! TradingView scanner request/response models.

use serde::{Deserialize, Serialize};

/// Body of a `POST /<screener>/scan` request.
#[derive(Debug, Serialize)]
pub struct ScanRequest {
    pub symbols: ScanSymbols,
    pub columns: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ScanSymbols {
    pub tickers: Vec<String>,
    pub query: ScanQuery,
}

#[derive(Debug, Serialize, Default)]
pub struct ScanQuery {
    pub types: Vec<String>,
}

impl ScanRequest {
    pub fn new(ticker: String, columns: Vec<String>) -> Self {
        Self {
            symbols: ScanSymbols {
                tickers: vec![ticker],
                query: ScanQuery::default(),
            },
            columns,
        }
    }
}

/// Scanner response. Rows are in request order; `d` holds one value per
/// requested column, `null` when the scanner has no value.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResponse {
    #[serde(default)]
    pub data: Vec<ScanRow>,
    pub total_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct ScanRow {
    pub s: String,
    #[serde(default)]
    pub d: Vec<Option<f64>>,
}
