//! Valuation module - concurrent pricing of a holdings list into a USD/KRW report.

mod valuation_errors;
mod valuation_model;
mod valuation_service;
mod valuation_traits;

#[cfg(test)]
mod valuation_service_tests;

pub use valuation_errors::ValuationError;
pub use valuation_model::{LineStatus, ValuationLine, ValuationReport, ValuationSettings};
pub use valuation_service::ValuationService;
pub use valuation_traits::ValuationServiceTrait;
