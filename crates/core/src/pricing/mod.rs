//! Pricing module - unit USD prices for equity and crypto holdings.

mod pricing_model;
mod pricing_service;
mod pricing_traits;


pub use pricing_model::{PriceSource, PricedValue, StaleFallback};
pub use pricing_service::PriceService;
pub use pricing_traits::PriceServiceTrait;
