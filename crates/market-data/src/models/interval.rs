use serde::{Deserialize, Serialize};

/// Sampling interval of an indicator snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Interval {
    /// Shortest granularity available; what the valuation engine uses.
    #[default]
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "2h")]
    TwoHours,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
}

impl Interval {
    /// Column suffix the TradingView scanner expects after an indicator name.
    ///
    /// The daily timeframe is the scanner's default and carries no suffix.
    pub fn column_suffix(&self) -> &'static str {
        match self {
            Self::OneMinute => "|1",
            Self::FiveMinutes => "|5",
            Self::FifteenMinutes => "|15",
            Self::ThirtyMinutes => "|30",
            Self::OneHour => "|60",
            Self::TwoHours => "|120",
            Self::FourHours => "|240",
            Self::OneDay => "",
            Self::OneWeek => "|1W",
            Self::OneMonth => "|1M",
        }
    }
}
