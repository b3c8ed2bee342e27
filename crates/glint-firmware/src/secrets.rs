//! Credentials baked in by `build.rs`

use glint_core::config::{Config, DEFAULT_QUOTE_ENDPOINT, InternetConfig, QuoteConfig};

pub const WIFI_SSID: &str = env!("WIFI_SSID");
pub const WIFI_PASSWORD: &str = env!("WIFI_PASSWORD");
pub const ALPHAVANTAGE_API_KEY: &str = env!("ALPHAVANTAGE_API_KEY");
pub const QUOTE_SYMBOL: &str = env!("QUOTE_SYMBOL");

/// Runtime configuration assembled from the compile-time values.
pub fn config() -> Config<'static> {
    Config {
        internet: InternetConfig {
            ssid: WIFI_SSID,
            password: WIFI_PASSWORD,
        },
        quotes: QuoteConfig {
            symbol: QUOTE_SYMBOL,
            api_key: ALPHAVANTAGE_API_KEY,
            endpoint: DEFAULT_QUOTE_ENDPOINT,
        },
    }
}
