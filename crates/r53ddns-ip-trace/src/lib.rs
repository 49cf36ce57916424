// # Trace IP Source
//
// This crate provides an HTTP-based IP source for the Route53 DDNS updater.
//
// ## Protocol
//
// The trace endpoint (by default `https://cloudflare.com/cdn-cgi/trace`)
// answers a plain GET with newline-separated `key=value` lines:
//
// ```text
// fl=123f45
// h=cloudflare.com
// ip=203.0.113.7
// loc=US
// ```
//
// The value of the `ip` key is the caller's public address as seen by the
// endpoint. One request per lookup, no retry, no caching.

use r53ddns_core::config::DEFAULT_TRACE_URL;
use r53ddns_core::traits::IpSource;
use r53ddns_core::{Error, Result};

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

/// Request timeout for the trace endpoint
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Key carrying the caller's address in a trace response
const IP_KEY: &str = "ip";

/// Extract the `ip` value from a trace response body
///
/// Each line is split on its first `=`. Returns `None` when no line has the
/// `ip` key.
pub fn parse_trace(body: &str) -> Option<&str> {
    body.lines()
        .filter_map(|line| line.split_once('='))
        .find(|(key, _)| key.trim() == IP_KEY)
        .map(|(_, value)| value.trim())
}

/// IP source backed by a `key=value` trace endpoint
#[derive(Debug, Clone)]
pub struct TraceIpSource {
    /// Trace endpoint URL
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl TraceIpSource {
    /// Create a trace IP source for `url`
    pub fn new(url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self::with_client(url, client)
    }

    /// Create a trace IP source with a caller-supplied HTTP client
    pub fn with_client(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            url: url.into(),
            client,
        }
    }

    /// The endpoint this source queries
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the trace body
    async fn fetch_trace(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::ip_source(format!("Request to {} failed: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(Error::ip_source(format!(
                "HTTP error from {}: {}",
                self.url,
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| Error::ip_source(format!("Failed to read response: {}", e)))
    }
}

impl Default for TraceIpSource {
    fn default() -> Self {
        Self::new(DEFAULT_TRACE_URL)
    }
}

#[async_trait::async_trait]
impl IpSource for TraceIpSource {
    async fn current(&self) -> Result<Ipv4Addr> {
        let body = self.fetch_trace().await?;

        let value = parse_trace(&body).ok_or_else(|| {
            Error::ip_source(format!("No '{}=' line in response from {}", IP_KEY, self.url))
        })?;
        tracing::debug!("Trace endpoint reported ip={}", value);

        match value.parse::<IpAddr>() {
            Ok(IpAddr::V4(ip)) => Ok(ip),
            Ok(IpAddr::V6(ip)) => Err(Error::ip_source(format!(
                "Expected IPv4, got: {} (use an IPv4-only trace endpoint)",
                ip
            ))),
            Err(_) => Err(Error::ip_source(format!("Invalid IP address: {}", value))),
        }
    }

    fn source_name(&self) -> &'static str {
        "trace"
    }
}
