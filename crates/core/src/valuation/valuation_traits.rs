use async_trait::async_trait;

use super::valuation_model::ValuationReport;
use crate::errors::Result;
use crate::holdings::Holding;

/// Trait defining the contract for portfolio valuation.
#[async_trait]
pub trait ValuationServiceTrait: Send + Sync {
    /// Prices every holding and sums the lines.
    ///
    /// Fails with `Error::ValuationFailed` only when a conversion rate is
    /// unavailable. Per-holding failures are reported on their line.
    async fn value(&self, holdings: &[Holding]) -> Result<ValuationReport>;
}
