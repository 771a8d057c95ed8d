use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the `mast-api` crate.
///
/// Covers URL construction, transport, HTTP status and response decoding.
/// The `mast` binary maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Request construction ────────────────────────────────────────
    /// No path segments were supplied after target selection.
    #[error("No API path given for the {kind} API")]
    EmptyPath { kind: String },

    /// The unit host is empty or otherwise unusable as a DNS name.
    #[error("Invalid host '{host}'")]
    InvalidHost { host: String },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Transport ───────────────────────────────────────────────────
    /// Host unreachable, DNS failure or connection refused.
    #[error("Could not connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out.
    #[error("Request to {url} timed out after {}", humantime::format_duration(*timeout))]
    Timeout { url: String, timeout: Duration },

    /// Any other HTTP transport error.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    // ── Response ────────────────────────────────────────────────────
    /// Server answered with a non-success status.
    #[error("HTTP {status} from {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// Body was not valid JSON, or a canonical envelope that does not decode.
    /// Carries the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// A canonical response carried `errors` or an `exception`.
    #[error("Remote error: {}", messages.join("; "))]
    Remote { messages: Vec<String> },
}

impl Error {
    /// Returns `true` if the host could not be reached at all.
    pub fn is_connect(&self) -> bool {
        match self {
            Self::Connect { .. } => true,
            Self::Transport(e) => e.is_connect(),
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    /// The HTTP status code, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
