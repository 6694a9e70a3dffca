//! Market data models
//!
//! - `instrument` - Provider lookup identity (Instrument) and its Screener
//! - `interval` - Sampling interval of indicator snapshots

mod instrument;
mod interval;

pub use instrument::{Instrument, Screener};
pub use interval::Interval;
