use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;

use folio_core::portfolio::{NewPortfolioAsset, PortfolioAsset, PortfolioRepositoryTrait, Preset};
use folio_core::Result;

use super::model::{NewPortfolioAssetDB, PortfolioAssetDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::portfolio_assets;

pub struct PortfolioRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl PortfolioRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        PortfolioRepository { pool, writer }
    }
}

#[async_trait]
impl PortfolioRepositoryTrait for PortfolioRepository {
    fn list_assets(&self, owner_id: i32, preset: Preset) -> Result<Vec<PortfolioAsset>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = portfolio_assets::table
            .filter(portfolio_assets::owner_id.eq(owner_id))
            .filter(portfolio_assets::preset.eq(i32::from(preset.value())))
            .order(portfolio_assets::id.asc())
            .select(PortfolioAssetDB::as_select())
            .load::<PortfolioAssetDB>(&mut conn)
            .into_core()?;
        rows.into_iter().map(PortfolioAsset::try_from).collect()
    }

    async fn replace_assets(
        &self,
        owner_id: i32,
        preset: Preset,
        assets: Vec<NewPortfolioAsset>,
    ) -> Result<Vec<PortfolioAsset>> {
        let rows: Vec<NewPortfolioAssetDB> = assets
            .into_iter()
            .map(|asset| NewPortfolioAssetDB::new(owner_id, preset, asset))
            .collect();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Vec<PortfolioAsset>> {
                let preset_value = i32::from(preset.value());
                diesel::delete(
                    portfolio_assets::table
                        .filter(portfolio_assets::owner_id.eq(owner_id))
                        .filter(portfolio_assets::preset.eq(preset_value)),
                )
                .execute(conn)
                .into_core()?;

                let mut saved = Vec::with_capacity(rows.len());
                for row in &rows {
                    let stored = diesel::insert_into(portfolio_assets::table)
                        .values(row)
                        .returning(PortfolioAssetDB::as_returning())
                        .get_result(conn)
                        .into_core()?;
                    saved.push(PortfolioAsset::try_from(stored)?);
                }
                Ok(saved)
            })
            .await
    }
}
