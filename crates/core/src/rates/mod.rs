//! Rates module - USD/KRW and USDT/KRW conversion rates.

mod rates_model;
mod rates_service;
mod rates_traits;

#[cfg(test)]
mod rates_service_tests;

pub use rates_model::{ConversionRates, RatePair};
pub use rates_service::RateService;
pub use rates_traits::RateServiceTrait;
