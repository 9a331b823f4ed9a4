//! HTTP exchange with the controller

use crate::api::errors::TransportError;
use crate::config::constants::CONTENT_TYPE;
use crate::config::runtime::{TlsCeiling, TransportConfig};
use crate::log_debug;
use reqwest::blocking::Client;
use reqwest::header;
use reqwest::tls::Version;
use std::error::Error as StdError;
use std::io;
use std::time::Duration;

/// Posts one request document and returns the response body
pub trait Transport {
    /// URL every request goes to
    fn endpoint(&self) -> &str;

    fn post(&self, body: &str) -> Result<String, TransportError>;
}

/// Blocking HTTPS transport. No timeouts, no retries.
#[derive(Debug)]
pub struct HttpsTransport {
    client: Client,
    endpoint: String,
}

impl HttpsTransport {
    pub fn new(endpoint: impl Into<String>, config: &TransportConfig) -> Result<Self, TransportError> {
        Ok(Self {
            client: build_http_client(config)?,
            endpoint: endpoint.into(),
        })
    }
}

impl Transport for HttpsTransport {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn post(&self, body: &str) -> Result<String, TransportError> {
        let response = self
            .client
            .post(self.endpoint.as_str())
            .header(header::CONTENT_TYPE, CONTENT_TYPE)
            .body(body.to_string())
            .send()
            .map_err(|e| classify(&e, &self.endpoint))?;

        log_debug!("HTTP response", "status" => response.status());

        response.text().map_err(|e| match classify(&e, &self.endpoint) {
            TransportError::Request { reason, .. } => TransportError::Body { reason },
            other => other,
        })
    }
}

fn build_http_client(config: &TransportConfig) -> Result<Client, TransportError> {
    let max_tls = match config.max_tls {
        TlsCeiling::Tls11 => Version::TLS_1_1,
        TlsCeiling::Tls12 => Version::TLS_1_2,
    };

    let mut builder = Client::builder()
        .timeout(None::<Duration>)
        .max_tls_version(max_tls)
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .danger_accept_invalid_hostnames(config.accept_invalid_certs);

    if let Some(proxy) = &config.proxy {
        let proxy = reqwest::Proxy::all(proxy.as_str()).map_err(|e| {
            TransportError::ClientBuild {
                reason: format!("invalid proxy '{}': {}", proxy, e),
            }
        })?;
        builder = builder.proxy(proxy);
    }

    builder.build().map_err(|e| TransportError::ClientBuild {
        reason: e.to_string(),
    })
}

/// Map a client error onto the transport taxonomy.
///
/// Walks the source chain below the client error: I/O kinds first, then the
/// wording used by the HTTP and TLS layers. The top-level message carries the
/// request URL and is never matched, so host names cannot steer the result.
fn classify(error: &reqwest::Error, endpoint: &str) -> TransportError {
    let endpoint = endpoint.to_string();
    let mut messages = Vec::new();
    let mut source = error.source();

    while let Some(current) = source {
        if let Some(io_error) = current.downcast_ref::<io::Error>() {
            match io_error.kind() {
                io::ErrorKind::ConnectionRefused => {
                    return TransportError::ConnectionRefused { endpoint }
                }
                io::ErrorKind::ConnectionReset => return TransportError::ConnectionReset { endpoint },
                io::ErrorKind::UnexpectedEof => return TransportError::ConnectionClosed { endpoint },
                _ => {}
            }
        }
        messages.push(current.to_string().to_lowercase());
        source = current.source();
    }

    let chain = messages.join(": ");
    if chain.contains("connection closed") || chain.contains("incompletemessage") || chain.contains("eof") {
        TransportError::ConnectionClosed { endpoint }
    } else if chain.contains("connection refused") {
        TransportError::ConnectionRefused { endpoint }
    } else if chain.contains("connection reset") {
        TransportError::ConnectionReset { endpoint }
    } else if chain.contains("handshake") || chain.contains("tls") || chain.contains("ssl") {
        TransportError::Handshake {
            endpoint,
            reason: error.to_string(),
        }
    } else {
        TransportError::Request {
            endpoint,
            reason: messages.pop().unwrap_or_else(|| error.to_string()),
        }
    }
}
