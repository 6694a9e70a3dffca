//! Holdings module - the engine's input model and its pricing dispatch.

mod holdings_model;

pub use holdings_model::{AssetCategory, CashCurrency, Holding, MarketInstrument, PricingPlan};
