//! Database models for portfolio assets.

use diesel::prelude::*;
use folio_core::portfolio::{NewPortfolioAsset, PortfolioAsset, Preset};
use folio_core::Result;

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::portfolio_assets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PortfolioAssetDB {
    pub id: i32,
    pub owner_id: i32,
    pub preset: i32,
    pub symbol: String,
    pub quantity: f64,
    pub screener: String,
    pub exchange: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::portfolio_assets)]
pub struct NewPortfolioAssetDB {
    pub owner_id: i32,
    pub preset: i32,
    pub symbol: String,
    pub quantity: f64,
    pub screener: String,
    pub exchange: String,
}

impl NewPortfolioAssetDB {
    pub fn new(owner_id: i32, preset: Preset, asset: NewPortfolioAsset) -> Self {
        Self {
            owner_id,
            preset: i32::from(preset.value()),
            symbol: asset.symbol,
            quantity: asset.quantity,
            screener: asset.screener,
            exchange: asset.exchange,
        }
    }
}

impl TryFrom<PortfolioAssetDB> for PortfolioAsset {
    type Error = folio_core::Error;

    fn try_from(db: PortfolioAssetDB) -> Result<Self> {
        Ok(Self {
            id: db.id,
            owner_id: db.owner_id,
            preset: Preset::new(i64::from(db.preset))?,
            symbol: db.symbol,
            quantity: db.quantity,
            screener: db.screener,
            exchange: db.exchange,
        })
    }
}
