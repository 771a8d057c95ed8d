//! CLI error types with miette diagnostics.
//!
//! Maps `mast_api::Error` and `mast_config::ConfigError` into user-facing
//! errors with actionable help text and stable exit codes.

use std::time::Duration;

use miette::Diagnostic;
use thiserror::Error;

use mast_config::ConfigError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const REMOTE: i32 = 9;
    pub const BAD_RESPONSE: i32 = 10;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to {url}")]
    #[diagnostic(
        code(mast::connection_failed),
        help(
            "Check that the service is running and the host is reachable.\n\
             Site hosts (mast-wis-control, mast-ns-spec, mast-wis-safety, ...) only resolve on the observatory network."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request to {url} timed out after {}", humantime::format_duration(*timeout))]
    #[diagnostic(
        code(mast::timeout),
        help("Increase the timeout with --timeout or check the service's responsiveness.")
    )]
    Timeout { url: String, timeout: Duration },

    #[error("HTTP transport error")]
    #[diagnostic(code(mast::transport))]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    // ── Remote ───────────────────────────────────────────────────────

    #[error("{url} not found (HTTP 404)")]
    #[diagnostic(
        code(mast::not_found),
        help("Check the API path; segments are joined with '/' after the fixed prefix.")
    )]
    NotFound { url: String },

    #[error("HTTP {status} from {url}")]
    #[diagnostic(code(mast::http_status), help("Response body: {body}"))]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Service reported an error: {}", messages.join("; "))]
    #[diagnostic(code(mast::remote))]
    Remote { messages: Vec<String> },

    #[error("Bad response: {message}")]
    #[diagnostic(code(mast::bad_response))]
    BadResponse { message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(mast::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Configuration error: {source}")]
    #[diagnostic(
        code(mast::config),
        help("Check the configuration file at {path} and MAST_* environment variables.")
    )]
    Config {
        #[source]
        source: ConfigError,
        path: String,
    },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(mast::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(mast::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::HttpStatus { .. } | Self::Remote { .. } => exit_code::REMOTE,
            Self::BadResponse { .. } => exit_code::BAD_RESPONSE,
            Self::Validation { .. } | Self::Config { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    pub fn config(source: ConfigError) -> Self {
        Self::Config {
            source,
            path: mast_config::config_path().display().to_string(),
        }
    }
}

// ── mast_api::Error → CliError mapping ───────────────────────────────

impl From<mast_api::Error> for CliError {
    fn from(err: mast_api::Error) -> Self {
        use mast_api::Error as Api;

        match err {
            Api::EmptyPath { kind } => CliError::Validation {
                field: "path".into(),
                reason: format!("the {kind} API needs at least one path segment"),
            },

            Api::InvalidHost { host } => CliError::Validation {
                field: "host".into(),
                reason: format!("'{host}' is not a usable host name"),
            },

            Api::InvalidUrl(e) => CliError::Validation {
                field: "url".into(),
                reason: e.to_string(),
            },

            Api::Connect { url, source } => CliError::ConnectionFailed {
                url,
                source: source.into(),
            },

            Api::Timeout { url, timeout } => CliError::Timeout { url, timeout },

            Api::Transport(e) => CliError::Transport(e.into()),

            Api::Status { url, status: 404, .. } => CliError::NotFound { url },

            Api::Status { url, status, body } => CliError::HttpStatus { url, status, body },

            Api::Deserialization { message, body: _ } => CliError::BadResponse { message },

            Api::Remote { messages } => CliError::Remote { messages },
        }
    }
}
