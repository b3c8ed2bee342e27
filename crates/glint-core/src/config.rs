//! Build-time and default configuration for both applications.
//!
//! Credentials arrive as compile-time constants (the firmware's build script
//! reads them from `.env`); everything else has defaults matching the
//! constants the device shipped with.

use alloc::format;
use alloc::string::String;

use embassy_time::Duration;
use serde::{Deserialize, Serialize};

/// Idle time between dispatcher passes.
pub const DISPATCH_IDLE: Duration = Duration::from_millis(5);

/// Largest HTTP body the stock board will accept.
pub const MAX_RESPONSE_BYTES: usize = 32 * 1024;

/// Default quote provider endpoint.
pub const DEFAULT_QUOTE_ENDPOINT: &str = "https://www.alphavantage.co/query";

/// Default ticker symbol.
pub const DEFAULT_SYMBOL: &str = "TSLA";

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(bound(deserialize = "'de: 'a"))]
pub struct Config<'a> {
    pub internet: InternetConfig<'a>,
    #[serde(default)]
    pub quotes: QuoteConfig<'a>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct InternetConfig<'a> {
    pub ssid: &'a str,
    pub password: &'a str,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct QuoteConfig<'a> {
    pub symbol: &'a str,
    pub api_key: &'a str,
    pub endpoint: &'a str,
}

impl Default for QuoteConfig<'_> {
    fn default() -> Self {
        Self {
            symbol: DEFAULT_SYMBOL,
            api_key: "demo",
            endpoint: DEFAULT_QUOTE_ENDPOINT,
        }
    }
}

impl QuoteConfig<'_> {
    /// URL of the daily time-series query for the configured symbol.
    pub fn daily_series_url(&self) -> String {
        format!(
            "{}?function=TIME_SERIES_DAILY&symbol={}&apikey={}",
            self.endpoint, self.symbol, self.api_key
        )
    }
}

/// Timing and bounds of the dashboard's periodic tasks.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct DashboardConfig {
    pub level_period_ms: u64,
    pub sweep_period_ms: u64,
    pub countdown_period_ms: u64,
    /// Starting charge of the vacuum battery slider
    pub vacuum_initial_level: u8,
    pub ev_low: i32,
    pub ev_high: i32,
    pub plug_low_w: i32,
    pub plug_high_w: i32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            level_period_ms: 100,
            sweep_period_ms: 100,
            countdown_period_ms: 1000,
            vacuum_initial_level: 100,
            ev_low: 0,
            ev_high: 100,
            plug_low_w: 155,
            plug_high_w: 199,
        }
    }
}

impl DashboardConfig {
    pub fn level_period(&self) -> Duration {
        Duration::from_millis(self.level_period_ms)
    }

    pub fn sweep_period(&self) -> Duration {
        Duration::from_millis(self.sweep_period_ms)
    }

    pub fn countdown_period(&self) -> Duration {
        Duration::from_millis(self.countdown_period_ms)
    }
}
