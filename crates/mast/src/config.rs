//! CLI configuration -- thin wrapper around `mast_config`.
//!
//! Re-exports the shared types and applies `GlobalOpts` flag overrides.

use std::time::Duration;

use mast_api::TransportConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use mast_config::{Config, config_path};

/// Load the config file + environment, mapping failures to `CliError`.
pub fn load() -> Result<Config, CliError> {
    mast_config::load_config().map_err(CliError::config)
}

/// Build transport settings; `--timeout` wins over the config value.
pub fn transport(global: &GlobalOpts, cfg: &Config) -> TransportConfig {
    let secs = global.timeout.unwrap_or(cfg.timeout);
    TransportConfig::default().with_timeout(Duration::from_secs(secs))
}
