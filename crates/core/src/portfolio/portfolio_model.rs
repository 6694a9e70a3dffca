use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{MAX_PRESET, MAX_SYMBOL_LEN, MIN_PRESET};
use crate::errors::ValidationError;
use crate::holdings::{AssetCategory, Holding};
use crate::valuation::ValuationReport;

/// One of the user's portfolio slots (1 to 3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Preset(u8);

impl Preset {
    pub fn new(value: i64) -> Result<Self, ValidationError> {
        if (MIN_PRESET as i64..=MAX_PRESET as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ValidationError::InvalidPreset(value))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self(MIN_PRESET)
    }
}

impl TryFrom<i64> for Preset {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Preset::new(value)
    }
}

impl From<Preset> for i64 {
    fn from(preset: Preset) -> Self {
        preset.0 as i64
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored portfolio line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAsset {
    pub id: i32,
    pub owner_id: i32,
    pub preset: Preset,
    pub symbol: String,
    pub quantity: f64,
    /// `"cash"`, `"crypto"`, or an equity market such as `"america"`.
    pub screener: String,
    pub exchange: String,
}

impl PortfolioAsset {
    pub fn to_holding(&self) -> Holding {
        Holding::new(
            self.symbol.clone(),
            self.quantity,
            AssetCategory::from_screener(&self.screener),
            self.exchange.clone(),
        )
    }
}

/// Input for saving a portfolio line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPortfolioAsset {
    pub symbol: String,
    pub quantity: f64,
    #[serde(default)]
    pub screener: String,
    #[serde(default)]
    pub exchange: String,
}

impl NewPortfolioAsset {
    /// Trims text fields and checks their limits.
    pub fn validate(self) -> Result<Self, ValidationError> {
        let symbol = self.symbol.trim().to_string();
        if symbol.is_empty() {
            return Err(ValidationError::MissingField("symbol".to_string()));
        }
        let screener = self.screener.trim().to_string();
        let exchange = self.exchange.trim().to_string();
        let fields = [
            ("symbol", &symbol),
            ("screener", &screener),
            ("exchange", &exchange),
        ];
        for (field, value) in fields {
            if value.chars().count() > MAX_SYMBOL_LEN {
                return Err(ValidationError::TooLong {
                    field: field.to_string(),
                    max: MAX_SYMBOL_LEN,
                });
            }
        }
        if !self.quantity.is_finite() {
            return Err(ValidationError::InvalidQuantity {
                symbol,
                quantity: self.quantity,
            });
        }
        Ok(Self {
            symbol,
            quantity: self.quantity,
            screener,
            exchange,
        })
    }
}

/// A valuation together with the stored assets it was computed from,
/// in the same order.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioValuation {
    pub assets: Vec<PortfolioAsset>,
    pub report: ValuationReport,
}
