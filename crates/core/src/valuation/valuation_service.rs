use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, warn};
use std::sync::Arc;

use super::valuation_errors::ValuationError;
use super::valuation_model::{LineStatus, ValuationLine, ValuationReport};
use super::valuation_traits::ValuationServiceTrait;
use crate::errors::Result;
use crate::holdings::{AssetCategory, CashCurrency, Holding, PricingPlan};
use crate::pricing::{PriceServiceTrait, PricedValue};
use crate::rates::{ConversionRates, RateServiceTrait};

/// Fans a holdings list out over the rate and price services.
///
/// Rates are fetched first; if either is missing nothing else is asked for.
/// Cash is converted in place, every market holding is priced on its own
/// task, and lines come back in input order.
#[derive(Clone)]
pub struct ValuationService {
    rates: Arc<dyn RateServiceTrait>,
    prices: Arc<dyn PriceServiceTrait>,
}

impl ValuationService {
    pub fn new(rates: Arc<dyn RateServiceTrait>, prices: Arc<dyn PriceServiceTrait>) -> Self {
        Self { rates, prices }
    }

    fn cash_line(
        holding: &Holding,
        currency: &CashCurrency,
        rates: &ConversionRates,
    ) -> ValuationLine {
        let quantity = holding.quantity;
        let (unit_price_usd, unit_price_krw, total_usd, total_krw) = match currency {
            CashCurrency::Krw => (1.0 / rates.usd_krw, 1.0, quantity / rates.usd_krw, quantity),
            CashCurrency::Usd => (1.0, rates.usd_krw, quantity, quantity * rates.usd_krw),
            CashCurrency::Usdt => (1.0, rates.usdt_krw, quantity, quantity * rates.usdt_krw),
            CashCurrency::Unsupported(symbol) => {
                warn!("Unsupported cash currency '{}', valued at zero", symbol);
                let err = ValuationError::InvalidHolding {
                    symbol: symbol.clone(),
                };
                return ValuationLine::zeroed(
                    holding.clone(),
                    LineStatus::UnsupportedCash,
                    err.to_string(),
                );
            }
        };

        ValuationLine {
            holding: holding.clone(),
            unit_price_usd,
            unit_price_krw,
            total_usd,
            total_krw,
            status: LineStatus::Priced,
            error: None,
        }
    }

    fn market_line(
        holding: &Holding,
        priced: PricedValue,
        rates: &ConversionRates,
    ) -> ValuationLine {
        // Crypto is quoted against USDT, which trades at its own KRW rate.
        let krw_rate = match holding.category {
            AssetCategory::Crypto => rates.usdt_krw,
            _ => rates.usd_krw,
        };
        let unit_price_usd = priced.price_usd;
        let unit_price_krw = unit_price_usd * krw_rate;

        ValuationLine {
            holding: holding.clone(),
            unit_price_usd,
            unit_price_krw,
            total_usd: unit_price_usd * holding.quantity,
            total_krw: unit_price_krw * holding.quantity,
            status: priced.source.into(),
            error: None,
        }
    }
}

#[async_trait]
impl ValuationServiceTrait for ValuationService {
    async fn value(&self, holdings: &[Holding]) -> Result<ValuationReport> {
        if holdings.is_empty() {
            return Ok(ValuationReport::empty());
        }

        let rates = self.rates.fetch_rates().await?;
        debug!(
            "Valuing {} holdings at USD/KRW {} USDT/KRW {}",
            holdings.len(),
            rates.usd_krw,
            rates.usdt_krw
        );

        let mut slots: Vec<Option<ValuationLine>> = Vec::with_capacity(holdings.len());
        let mut pending = Vec::new();

        for (index, holding) in holdings.iter().enumerate() {
            match holding.pricing_plan() {
                PricingPlan::Cash(currency) => {
                    slots.push(Some(Self::cash_line(holding, &currency, &rates)));
                }
                PricingPlan::Market(instrument) => {
                    let prices = Arc::clone(&self.prices);
                    let task =
                        tokio::spawn(async move { prices.fetch_unit_price(&instrument).await });
                    pending.push((index, task));
                    slots.push(None);
                }
            }
        }

        let (indices, tasks): (Vec<usize>, Vec<_>) = pending.into_iter().unzip();
        let results = join_all(tasks).await;

        for (index, joined) in indices.into_iter().zip(results) {
            let holding = &holdings[index];
            let line = match joined {
                Ok(Ok(priced)) => Self::market_line(holding, priced, &rates),
                Ok(Err(e)) => {
                    warn!("No price for {}: {}", holding.symbol, e);
                    ValuationLine::zeroed(
                        holding.clone(),
                        LineStatus::PriceUnavailable,
                        e.to_string(),
                    )
                }
                Err(e) => {
                    warn!("Pricing task for {} did not finish: {}", holding.symbol, e);
                    let err = ValuationError::PriceUnavailable {
                        symbol: holding.symbol.clone(),
                        reason: format!("pricing task failed: {}", e),
                    };
                    ValuationLine::zeroed(
                        holding.clone(),
                        LineStatus::PriceUnavailable,
                        err.to_string(),
                    )
                }
            };
            slots[index] = Some(line);
        }

        let lines: Vec<ValuationLine> = slots.into_iter().flatten().collect();
        Ok(ValuationReport::from_lines(lines, rates))
    }
}
