// HTTP client for the MAST REST APIs
//
// One GET per call, no retries. The body is decoded as JSON; transport,
// status and decoding failures are mapped into distinct `Error` variants.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::endpoint::{Endpoint, Ports, Target};
use crate::error::Error;
use crate::transport::TransportConfig;

/// Longest body excerpt carried in error variants.
const BODY_PREVIEW_LEN: usize = 200;

/// Raw JSON client for MAST controller, unit, spec and safety services.
pub struct MastClient {
    http: reqwest::Client,
    timeout: Duration,
}

impl MastClient {
    /// Create a new client from a `TransportConfig`.
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            timeout: transport.timeout,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn from_reqwest(http: reqwest::Client) -> Self {
        Self {
            http,
            timeout: TransportConfig::default().timeout,
        }
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Resolve `target` + `path` and fetch it.
    pub async fn fetch_target<S: AsRef<str> + Sync>(
        &self,
        target: &Target,
        ports: &Ports,
        path: &[S],
    ) -> Result<Value, Error> {
        let url = Endpoint::for_target(target, ports)?.url(path)?;
        self.fetch(url).await
    }

    /// Send a single GET and decode the body as JSON.
    pub async fn fetch(&self, url: Url) -> Result<Value, Error> {
        debug!("GET {url}");
        let url_str = url.to_string();

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(&url_str, e))?;

        let status = resp.status();
        trace!(status = status.as_u16(), "response received");

        let body = resp.text().await.map_err(|e| self.classify(&url_str, e))?;

        if !status.is_success() {
            return Err(Error::Status {
                url: url_str,
                status: status.as_u16(),
                body: preview(&body).to_owned(),
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("not valid JSON: {e} (body preview: {:?})", preview(&body)),
            body,
        })
    }

    fn classify(&self, url: &str, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                url: url.to_owned(),
                timeout: self.timeout,
            }
        } else if err.is_connect() {
            Error::Connect {
                url: url.to_owned(),
                source: err,
            }
        } else {
            Error::Transport(err)
        }
    }
}

fn preview(body: &str) -> &str {
    if body.len() <= BODY_PREVIEW_LEN {
        return body;
    }
    let mut end = BODY_PREVIEW_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
