//! Decoding of the provider's `TIME_SERIES_DAILY` document.
//!
//! ```json
//! {
//!   "Meta Data": { "2. Symbol": "TSLA", "3. Last Refreshed": "2024-01-05" },
//!   "Time Series (Daily)": {
//!     "2024-01-05": { "1. open": "238.12", "2. high": "240.00", "3. low": "236.40",
//!                     "4. close": "237.49", "5. volume": "92488948" }
//!   }
//! }
//! ```
//!
//! Prices arrive as strings. Bare JSON numbers are accepted as well.

use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use log::debug;
use serde::Deserialize;

use super::{OhlcRecord, QuoteError, QuoteSnapshot, SERIES_LEN};
use crate::app_state::{display_message, truncated};

#[derive(Debug, Deserialize)]
struct DailySeriesDocument {
    #[serde(rename = "Meta Data", default)]
    meta: MetaData,
    #[serde(rename = "Time Series (Daily)", default)]
    series: BTreeMap<String, DailyBar>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MetaData {
    #[serde(rename = "2. Symbol", default)]
    symbol: String,
    #[serde(rename = "3. Last Refreshed", default)]
    last_refreshed: String,
}

#[derive(Debug, Deserialize)]
struct DailyBar {
    #[serde(rename = "1. open")]
    open: Numeric,
    #[serde(rename = "2. high")]
    high: Numeric,
    #[serde(rename = "3. low")]
    low: Numeric,
    #[serde(rename = "4. close")]
    close: Numeric,
    #[serde(rename = "5. volume")]
    volume: Numeric,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Text(String),
    Number(f64),
}

impl Numeric {
    fn to_price(&self, date: &str, field: &str) -> Result<f32, QuoteError> {
        match self {
            Numeric::Number(value) => Ok(*value as f32),
            Numeric::Text(text) => text.trim().parse::<f32>().map_err(|_| {
                QuoteError::Json(truncated(&format!("{date}: bad {field} '{text}'")))
            }),
        }
    }

    fn into_text(self) -> String {
        match self {
            Numeric::Text(text) => text,
            Numeric::Number(value) => value.to_string(),
        }
    }
}

impl DailyBar {
    fn into_record(self, date: String) -> Result<OhlcRecord, QuoteError> {
        Ok(OhlcRecord {
            open: self.open.to_price(&date, "open")?,
            high: self.high.to_price(&date, "high")?,
            low: self.low.to_price(&date, "low")?,
            close: self.close.to_price(&date, "close")?,
            volume: self.volume.into_text(),
            date,
        })
    }
}

/// Parse a response body into the newest [`SERIES_LEN`] records.
///
/// Dates are compared as strings, which orders `YYYY-MM-DD` correctly.
pub fn parse_daily_series(body: &str) -> Result<QuoteSnapshot, QuoteError> {
    let document: DailySeriesDocument =
        serde_json::from_str(body).map_err(|err| QuoteError::Json(display_message(&err)))?;

    if document.series.is_empty() {
        let notice = document
            .error_message
            .or(document.information)
            .or(document.note);
        return Err(match notice {
            Some(text) => QuoteError::Provider(truncated(&text)),
            None => QuoteError::NoData,
        });
    }

    let records = document
        .series
        .into_iter()
        .rev()
        .take(SERIES_LEN)
        .map(|(date, bar)| bar.into_record(date))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "Parsed {} daily records for {} (newest {})",
        records.len(),
        document.meta.symbol,
        records[0].date
    );

    Ok(QuoteSnapshot {
        symbol: document.meta.symbol,
        last_refreshed: document.meta.last_refreshed,
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(open: &str, high: &str, low: &str, close: &str) -> String {
        format!(
            r#"{{"1. open":"{open}","2. high":"{high}","3. low":"{low}","4. close":"{close}","5. volume":"1200"}}"#
        )
    }

    fn document(dates: &[&str]) -> String {
        let entries: Vec<String> = dates
            .iter()
            .map(|date| format!(r#""{date}":{}"#, bar("10.0", "12.5", "9.5", "11.0")))
            .collect();
        format!(
            r#"{{"Meta Data":{{"1. Information":"Daily Prices","2. Symbol":"TSLA","3. Last Refreshed":"2024-01-05"}},"Time Series (Daily)":{{{}}}}}"#,
            entries.join(",")
        )
    }

    #[test]
    fn sorts_dates_descending() {
        let snapshot =
            parse_daily_series(&document(&["2024-01-05", "2024-01-03", "2024-01-04"])).unwrap();
        let dates: Vec<&str> = snapshot.records.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, ["2024-01-05", "2024-01-04", "2024-01-03"]);
        assert_eq!(snapshot.symbol, "TSLA");
        assert_eq!(snapshot.last_refreshed, "2024-01-05");
    }

    #[test]
    fn keeps_only_the_newest_ten() {
        let dates: Vec<String> = (1..=15).map(|day| format!("2024-02-{day:02}")).collect();
        let refs: Vec<&str> = dates.iter().map(String::as_str).collect();
        let snapshot = parse_daily_series(&document(&refs)).unwrap();

        assert_eq!(snapshot.records.len(), SERIES_LEN);
        assert_eq!(snapshot.records[0].date, "2024-02-15");
        assert_eq!(snapshot.records[9].date, "2024-02-06");
    }

    #[test]
    fn decodes_prices_and_keeps_volume_text() {
        let body = format!(
            r#"{{"Time Series (Daily)":{{"2024-01-05":{}}}}}"#,
            bar("238.12", "240.00", "236.40", "237.49")
        );
        let snapshot = parse_daily_series(&body).unwrap();
        let latest = snapshot.latest().unwrap();
        assert_eq!(latest.open, 238.12);
        assert_eq!(latest.low, 236.4);
        assert_eq!(latest.volume, "1200");
        assert!(!latest.is_bullish());
        assert_eq!(snapshot.symbol, "");
    }

    #[test]
    fn accepts_bare_numbers() {
        let body = r#"{"Time Series (Daily)":{"2024-01-05":{"1. open":1,"2. high":2.5,"3. low":0.5,"4. close":2,"5. volume":300}}}"#;
        let snapshot = parse_daily_series(body).unwrap();
        assert_eq!(snapshot.records[0].high, 2.5);
        assert_eq!(snapshot.records[0].volume, "300");
    }

    #[test]
    fn provider_notice_is_reported() {
        let body = r#"{"Information":"Thank you for using Alpha Vantage! Our standard API rate limit is 25 requests per day."}"#;
        match parse_daily_series(body) {
            Err(QuoteError::Provider(message)) => assert!(message.starts_with("Thank you")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn malformed_input_is_a_json_error() {
        assert!(matches!(parse_daily_series("<html>"), Err(QuoteError::Json(_))));
        let body = format!(
            r#"{{"Time Series (Daily)":{{"2024-01-05":{}}}}}"#,
            bar("n/a", "1", "1", "1")
        );
        assert!(matches!(parse_daily_series(&body), Err(QuoteError::Json(_))));
    }

    #[test]
    fn empty_series_is_no_data() {
        assert!(matches!(
            parse_daily_series(r#"{"Time Series (Daily)":{}}"#),
            Err(QuoteError::NoData)
        ));
        assert!(matches!(parse_daily_series("{}"), Err(QuoteError::NoData)));
    }
}
