//! URL-fetch capability and the default ureq transport.
//!
//! # Design
//! The client never talks to the network directly; it hands a fully built
//! URL to a `UrlFetcher` and gets back a plain-data `FetchResponse`. The
//! indirection exists so tests can substitute a deterministic stand-in for
//! real HTTP. All fields are owned types so responses can be captured,
//! cloned, and asserted on freely.

use std::time::Duration;

use thiserror::Error;

/// How long the default transport waits for a complete round trip.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches a URL and returns the response as plain data.
///
/// Implementations decide their own timeout behavior; a failure to produce
/// a body at all is a `FetchError`, which the client propagates unchanged.
pub trait UrlFetcher: Send + Sync {
    fn fetch_url(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

/// An HTTP response described as plain data.
///
/// The client decodes only `body` (the service signals failures inside the
/// JSON, not via status codes); status and headers are carried for fetcher
/// implementations and diagnostics.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Transport-level failure: the server was unreachable or the response
/// could not be read.
#[derive(Debug, Error)]
#[error("transport error: {0}")]
pub struct FetchError(pub String);

/// Default production fetcher on ureq.
///
/// Non-2xx statuses are returned as data rather than errors so their bodies
/// still reach the client's JSON decoding, and an overall timeout bounds
/// every round trip so a hung server cannot block the caller indefinitely.
pub struct UreqFetcher {
    agent: ureq::Agent,
}

impl UreqFetcher {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlFetcher for UreqFetcher {
    fn fetch_url(&self, url: &str) -> Result<FetchResponse, FetchError> {
        let mut response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| FetchError(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| FetchError(e.to_string()))?;

        Ok(FetchResponse {
            status,
            headers,
            body,
        })
    }
}
