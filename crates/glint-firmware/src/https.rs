//! HTTPS transport for the quote fetch
//!
//! One `reqwless` client per request over the shared embassy-net stack. TLS
//! runs without certificate verification; the device has no trust store.

use embassy_net::Stack;
use embassy_net::dns::DnsSocket;
use embassy_net::tcp::client::TcpClient;
use glint_core::app_state::debug_message;
use glint_core::config::MAX_RESPONSE_BYTES;
use glint_core::quotes::{HttpResponse, QuoteTransport, TransportError};
use log::debug;
use reqwless::client::{HttpClient, TlsConfig, TlsVerify};
use reqwless::request::{Method, RequestBuilder};

/// TLS record buffers; a full record is 16 KiB plus overhead.
pub const TLS_READ_BUF_SIZE: usize = 16_640;
pub const TLS_WRITE_BUF_SIZE: usize = 4_096;

/// Response headers plus the largest accepted body.
pub const RX_BUF_SIZE: usize = MAX_RESPONSE_BYTES + 4_096;

/// TCP sockets the client may hold open at once
pub const TCP_SOCKETS: usize = 1;
pub const TCP_TX_SIZE: usize = 1_024;
pub const TCP_RX_SIZE: usize = 4_096;

pub type QuoteTcpClient<'a> = TcpClient<'a, TCP_SOCKETS, TCP_TX_SIZE, TCP_RX_SIZE>;

/// Buffers one request needs, kept off the stack.
pub struct HttpsBuffers {
    pub tls_read: [u8; TLS_READ_BUF_SIZE],
    pub tls_write: [u8; TLS_WRITE_BUF_SIZE],
    pub rx: [u8; RX_BUF_SIZE],
}

impl HttpsBuffers {
    pub const fn new() -> Self {
        Self {
            tls_read: [0; TLS_READ_BUF_SIZE],
            tls_write: [0; TLS_WRITE_BUF_SIZE],
            rx: [0; RX_BUF_SIZE],
        }
    }
}

impl Default for HttpsBuffers {
    fn default() -> Self {
        Self::new()
    }
}

pub struct HttpsTransport<'a> {
    stack: Stack<'a>,
    tcp: &'a QuoteTcpClient<'a>,
    dns: &'a DnsSocket<'a>,
    buffers: &'a mut HttpsBuffers,
    seed: u64,
}

impl<'a> HttpsTransport<'a> {
    pub fn new(
        stack: Stack<'a>,
        tcp: &'a QuoteTcpClient<'a>,
        dns: &'a DnsSocket<'a>,
        buffers: &'a mut HttpsBuffers,
        seed: u64,
    ) -> Self {
        Self {
            stack,
            tcp,
            dns,
            buffers,
            seed,
        }
    }
}

fn classify(err: reqwless::Error) -> TransportError {
    match err {
        reqwless::Error::Dns => TransportError::Dns(debug_message(&err)),
        reqwless::Error::Network(_) | reqwless::Error::ConnectionAborted => {
            TransportError::Connect(debug_message(&err))
        }
        reqwless::Error::Tls(_) => TransportError::Tls(debug_message(&err)),
        reqwless::Error::BufferTooSmall => TransportError::BodyTooLarge {
            limit: MAX_RESPONSE_BYTES,
        },
        other => TransportError::Request(debug_message(&other)),
    }
}

impl QuoteTransport for HttpsTransport<'_> {
    fn is_connected(&self) -> bool {
        self.stack.is_link_up() && self.stack.is_config_up()
    }

    async fn get(&mut self, url: &str) -> Result<HttpResponse, TransportError> {
        let HttpsBuffers {
            tls_read,
            tls_write,
            rx,
        } = &mut *self.buffers;
        let tls = TlsConfig::new(self.seed, tls_read, tls_write, TlsVerify::None);
        let mut client = HttpClient::new_with_tls(self.tcp, self.dns, tls);

        let mut request = client
            .request(Method::GET, url)
            .await
            .map_err(classify)?
            .headers(&[("Accept", "application/json")]);
        let response = request.send(rx).await.map_err(classify)?;
        let status = response.status.0;
        debug!("HTTP status {}", status);

        let body = response.body().read_to_end().await.map_err(classify)?;
        if body.len() > MAX_RESPONSE_BYTES {
            return Err(TransportError::BodyTooLarge {
                limit: MAX_RESPONSE_BYTES,
            });
        }
        let text = core::str::from_utf8(body).map_err(|_| TransportError::InvalidUtf8)?;
        Ok(HttpResponse::new(status, text))
    }
}
