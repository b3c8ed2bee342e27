//! Bakes Wi-Fi and quote-provider credentials into the binary.
//!
//! Values come from the process environment or a `.env` file in this
//! directory or any parent. Missing required keys build with an empty value
//! and a warning; the device then fails to join or gets a provider error.

const REQUIRED: [&str; 3] = ["WIFI_SSID", "WIFI_PASSWORD", "ALPHAVANTAGE_API_KEY"];

const DEFAULT_SYMBOL: &str = "TSLA";

fn main() {
    match dotenvy::dotenv() {
        Ok(path) => println!("cargo:rerun-if-changed={}", path.display()),
        Err(_) => println!("cargo:warning=no .env file found; using the process environment"),
    }

    for key in REQUIRED {
        println!("cargo:rerun-if-env-changed={key}");
        let value = std::env::var(key).unwrap_or_else(|_| {
            println!("cargo:warning={key} is not set");
            String::new()
        });
        println!("cargo:rustc-env={key}={value}");
    }

    println!("cargo:rerun-if-env-changed=QUOTE_SYMBOL");
    let symbol = std::env::var("QUOTE_SYMBOL").unwrap_or_else(|_| DEFAULT_SYMBOL.into());
    println!("cargo:rustc-env=QUOTE_SYMBOL={symbol}");

    println!("cargo:rustc-link-arg=-Tlinkall.x");
}
