//! One-shot quote fetch over a pluggable HTTP transport.
//!
//! The firmware supplies a TLS client on top of the Wi-Fi stack; the
//! simulator and tests supply canned responses.

use alloc::string::String;

use log::{info, warn};

use super::{QuoteError, QuoteSnapshot, TransportError, parse_daily_series};
use crate::config::{MAX_RESPONSE_BYTES, QuoteConfig};

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// An HTTP GET client plus the link state it depends on.
#[allow(async_fn_in_trait)]
pub trait QuoteTransport {
    /// Whether the network link is up.
    fn is_connected(&self) -> bool;

    /// Issue a GET and return the status and body.
    async fn get(&mut self, url: &str) -> Result<HttpResponse, TransportError>;
}

/// Fetch and decode the daily series described by `config`.
///
/// No retries: every failure is returned once for the caller to log.
pub async fn fetch_daily_series<T: QuoteTransport>(
    transport: &mut T,
    config: &QuoteConfig<'_>,
) -> Result<QuoteSnapshot, QuoteError> {
    if !transport.is_connected() {
        return Err(QuoteError::NetworkUnavailable);
    }

    info!("Requesting daily series for {}", config.symbol);
    let url = config.daily_series_url();
    let response = transport.get(&url).await?;
    info!(
        "HTTP GET -> status {} ({} bytes)",
        response.status,
        response.body.len()
    );

    if !response.is_success() {
        return Err(QuoteError::HttpStatus(response.status));
    }
    if response.body.len() > MAX_RESPONSE_BYTES {
        warn!("Dropping oversized response");
        return Err(TransportError::BodyTooLarge {
            limit: MAX_RESPONSE_BYTES,
        }
        .into());
    }

    parse_daily_series(&response.body)
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;
    use alloc::vec;
    use alloc::vec::Vec;

    use embassy_futures::block_on;

    use super::*;
    use crate::app_state::truncated;

    /// Replays canned responses and records requested URLs.
    struct CannedTransport {
        connected: bool,
        responses: Vec<Result<HttpResponse, TransportError>>,
        requests: Vec<String>,
    }

    impl CannedTransport {
        fn replying(response: Result<HttpResponse, TransportError>) -> Self {
            Self {
                connected: true,
                responses: vec![response],
                requests: Vec::new(),
            }
        }
    }

    impl QuoteTransport for CannedTransport {
        fn is_connected(&self) -> bool {
            self.connected
        }

        async fn get(&mut self, url: &str) -> Result<HttpResponse, TransportError> {
            self.requests.push(url.to_string());
            self.responses
                .pop()
                .unwrap_or(Err(TransportError::Request(truncated("no response queued"))))
        }
    }

    const BODY: &str = r#"{"Meta Data":{"2. Symbol":"IBM","3. Last Refreshed":"2024-01-05"},"Time Series (Daily)":{"2024-01-05":{"1. open":"1","2. high":"2","3. low":"0.5","4. close":"1.5","5. volume":"10"}}}"#;

    #[test]
    fn builds_the_query_url() {
        let mut transport = CannedTransport::replying(Ok(HttpResponse::new(200, BODY)));
        let config = QuoteConfig {
            symbol: "IBM",
            api_key: "KEY",
            endpoint: "https://example.test/query",
        };
        let snapshot = block_on(fetch_daily_series(&mut transport, &config)).unwrap();

        assert_eq!(snapshot.symbol, "IBM");
        assert_eq!(
            transport.requests,
            ["https://example.test/query?function=TIME_SERIES_DAILY&symbol=IBM&apikey=KEY"]
        );
    }

    #[test]
    fn offline_skips_the_request() {
        let mut transport = CannedTransport::replying(Ok(HttpResponse::new(200, BODY)));
        transport.connected = false;
        let result = block_on(fetch_daily_series(&mut transport, &QuoteConfig::default()));
        assert_eq!(result, Err(QuoteError::NetworkUnavailable));
        assert!(transport.requests.is_empty());
    }

    #[test]
    fn non_success_status_is_an_error() {
        let mut transport = CannedTransport::replying(Ok(HttpResponse::new(503, BODY)));
        let result = block_on(fetch_daily_series(&mut transport, &QuoteConfig::default()));
        assert_eq!(result, Err(QuoteError::HttpStatus(503)));
    }

    #[test]
    fn transport_failures_pass_through() {
        let failure = TransportError::Dns(truncated("no such host"));
        let mut transport = CannedTransport::replying(Err(failure.clone()));
        let result = block_on(fetch_daily_series(&mut transport, &QuoteConfig::default()));
        assert_eq!(result, Err(QuoteError::Transport(failure)));
    }

    #[test]
    fn oversized_body_is_rejected() {
        let body = " ".repeat(MAX_RESPONSE_BYTES + 1);
        let mut transport = CannedTransport::replying(Ok(HttpResponse::new(200, body)));
        let result = block_on(fetch_daily_series(&mut transport, &QuoteConfig::default()));
        assert_eq!(
            result,
            Err(QuoteError::Transport(TransportError::BodyTooLarge {
                limit: MAX_RESPONSE_BYTES
            }))
        );
    }
}
