//! Daily stock quotes: the record model, the provider's JSON document and the
//! one-shot fetch over a pluggable HTTP transport.

pub mod fetch;
pub mod parse;

pub use fetch::{HttpResponse, QuoteTransport, fetch_daily_series};
pub use parse::parse_daily_series;

use alloc::string::String;

use thiserror_no_std::Error;

use crate::app_state::ErrorMessage;

/// Number of trading days kept and charted.
pub const SERIES_LEN: usize = 10;

/// One trading day.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OhlcRecord {
    /// `YYYY-MM-DD`
    pub date: String,
    pub open: f32,
    pub high: f32,
    pub low: f32,
    pub close: f32,
    /// Kept exactly as the provider sent it.
    pub volume: String,
}

impl OhlcRecord {
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// Two-digit day of month, or the whole date if it is shorter than expected.
    pub fn day_of_month(&self) -> &str {
        self.date.get(8..10).unwrap_or(&self.date)
    }
}

/// Most recent trading days, newest first (`records[0]`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteSeries {
    records: [OhlcRecord; SERIES_LEN],
}

impl QuoteSeries {
    pub fn records(&self) -> &[OhlcRecord; SERIES_LEN] {
        &self.records
    }

    pub fn latest(&self) -> &OhlcRecord {
        &self.records[0]
    }

    /// Overwrite slots `0..records.len()`; later slots keep their contents.
    pub fn apply(&mut self, records: &[OhlcRecord]) {
        for (slot, record) in self.records.iter_mut().zip(records) {
            slot.clone_from(record);
        }
    }

    /// Records oldest first, the order candles are drawn left to right.
    pub fn chronological(&self) -> impl Iterator<Item = &OhlcRecord> {
        self.records.iter().rev()
    }

    /// Lowest low across every slot.
    pub fn min_low(&self) -> f32 {
        self.records.iter().map(|r| r.low).fold(f32::INFINITY, f32::min)
    }

    /// Highest high across every slot.
    pub fn max_high(&self) -> f32 {
        self.records
            .iter()
            .map(|r| r.high)
            .fold(f32::NEG_INFINITY, f32::max)
    }
}

/// Everything one successful fetch produced.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteSnapshot {
    pub symbol: String,
    pub last_refreshed: String,
    /// Newest first, at most [`SERIES_LEN`] entries, never empty.
    pub records: alloc::vec::Vec<OhlcRecord>,
}

impl QuoteSnapshot {
    pub fn latest(&self) -> Option<&OhlcRecord> {
        self.records.first()
    }
}

/// Failures of the HTTP transport itself.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("DNS lookup failed: {0}")]
    Dns(ErrorMessage),
    #[error("Connection failed: {0}")]
    Connect(ErrorMessage),
    #[error("TLS handshake failed: {0}")]
    Tls(ErrorMessage),
    #[error("Request failed: {0}")]
    Request(ErrorMessage),
    #[error("Response body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },
    #[error("Response body is not UTF-8")]
    InvalidUtf8,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    #[error("Network unavailable")]
    NetworkUnavailable,
    #[error("Transport error: {0}")]
    Transport(TransportError),
    #[error("HTTP status {0}")]
    HttpStatus(u16),
    #[error("Invalid JSON: {0}")]
    Json(ErrorMessage),
    #[error("Provider returned a notice: {0}")]
    Provider(ErrorMessage),
    #[error("No data in time series")]
    NoData,
}

impl From<TransportError> for QuoteError {
    fn from(err: TransportError) -> Self {
        QuoteError::Transport(err)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec::Vec;

    use super::*;

    fn record(date: &str, low: f32, high: f32) -> OhlcRecord {
        OhlcRecord {
            date: date.to_string(),
            open: low,
            high,
            low,
            close: high,
            volume: "1".to_string(),
        }
    }

    #[test]
    fn short_update_keeps_later_slots() {
        let mut series = QuoteSeries::default();
        let full: Vec<_> = (0..SERIES_LEN).map(|i| record("2024-01-01", i as f32, 50.0)).collect();
        series.apply(&full);

        series.apply(&[record("2024-02-01", 7.0, 8.0)]);
        assert_eq!(series.latest().date, "2024-02-01");
        assert_eq!(series.records()[1].low, 1.0);
        assert_eq!(series.records()[9].low, 9.0);
    }

    #[test]
    fn extremes_span_every_slot() {
        let mut series = QuoteSeries::default();
        let records: Vec<_> = (0..SERIES_LEN)
            .map(|i| record("2024-01-01", 100.0 + i as f32, 110.0 + i as f32))
            .collect();
        series.apply(&records);
        assert_eq!(series.min_low(), 100.0);
        assert_eq!(series.max_high(), 119.0);
        assert_eq!(series.chronological().next().map(|r| r.low), Some(109.0));
    }

    #[test]
    fn day_of_month_falls_back_to_whole_date() {
        assert_eq!(record("2024-03-07", 0.0, 0.0).day_of_month(), "07");
        assert_eq!(record("bad", 0.0, 0.0).day_of_month(), "bad");
    }
}
