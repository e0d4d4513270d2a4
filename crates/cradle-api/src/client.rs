// Cradle service HTTP client
//
// Wraps `reqwest::Client` with URL construction, status mapping, and body
// decoding. Endpoint families (auth, agents, alerts, ...) are implemented as
// inherent methods in separate files to keep this module focused on
// transport mechanics. No retries, no caching: one call, one round trip.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::Outcome;
use crate::transport::TransportConfig;

/// Raw HTTP client for the cradle service.
///
/// Cheap to clone: the inner `reqwest::Client` (and its cookie jar) is
/// reference counted, so clones share one session.
#[derive(Debug, Clone)]
pub struct CradleClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl CradleClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the service origin, e.g. `http://www.smartcradle.kro.kr`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, base_url, transport.timeout)
    }

    /// Create a client around a pre-built `reqwest::Client`.
    ///
    /// The caller is responsible for attaching a cookie store; without one,
    /// every call after `login` fails with [`Error::SessionExpired`].
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        timeout: Duration,
    ) -> Result<Self, Error> {
        if base_url.cannot_be_a_base() {
            return Err(Error::UnsupportedBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            http,
            base_url,
            timeout,
        })
    }

    /// The service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/{segments...}`, percent-encoding each segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::UnsupportedBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request on an authenticated endpoint and decode the body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let body = self.read_body(resp, true).await?;
        decode(&body)
    }

    /// Send a POST with a JSON body and decode the response body.
    ///
    /// `authenticated: false` is used by the login/register endpoints, where
    /// a 401 means bad credentials rather than an expired session.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: Option<&(impl Serialize + ?Sized)>,
        authenticated: bool,
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        let mut req = self.http.post(url);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await.map_err(|e| self.transport_error(e))?;
        let body = self.read_body(resp, authenticated).await?;
        decode(&body)
    }

    /// Send a POST to an acknowledgement-style endpoint.
    ///
    /// An empty or non-JSON 2xx body counts as success; a JSON body that
    /// reports failure becomes [`Error::Rejected`].
    pub(crate) async fn post_ack(
        &self,
        url: Url,
        body: Option<&(impl Serialize + ?Sized)>,
    ) -> Result<Outcome, Error> {
        debug!("POST {}", url);
        let mut req = self.http.post(url);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await.map_err(|e| self.transport_error(e))?;
        let body = self.read_body(resp, true).await?;
        let outcome: Outcome = serde_json::from_str(&body).unwrap_or_default();
        if outcome.is_rejected() {
            return Err(Error::Rejected {
                message: outcome
                    .message()
                    .unwrap_or("request rejected by server")
                    .to_owned(),
            });
        }
        Ok(outcome)
    }

    /// Check the status line and return the body text of a 2xx response.
    async fn read_body(
        &self,
        resp: reqwest::Response,
        authenticated: bool,
    ) -> Result<String, Error> {
        let status = resp.status();

        if authenticated
            && (status == reqwest::StatusCode::UNAUTHORIZED
                || status == reqwest::StatusCode::FORBIDDEN)
        {
            return Err(Error::SessionExpired);
        }

        let body = resp.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: error_message(&body)
                    .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_owned()),
            });
        }

        Ok(body)
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, Error> {
    serde_json::from_str(body).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body: body.to_owned(),
    })
}

/// Pull the server's explanation out of an error body.
///
/// Prefers a JSON `message`, then `error`, then the raw text if it is short
/// enough to be a message rather than an HTML error page.
fn error_message(body: &str) -> Option<String> {
    if let Ok(outcome) = serde_json::from_str::<Outcome>(body) {
        if let Some(msg) = outcome.message() {
            return Some(msg.to_owned());
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed.starts_with('<') || trimmed.len() > 200 {
        None
    } else {
        Some(trimmed.to_owned())
    }
}
