//! Configuration for the `mast` CLI.
//!
//! Built-in defaults reproduce the stock deployment (site `wis`, ports
//! 8002/8000/8001 for control/unit/spec, 8001 for safety, 20 s timeout). A TOML file in the platform config
//! directory and `MAST_`-prefixed environment variables layer on top.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use mast_api::transport::DEFAULT_TIMEOUT_SECS;
use mast_api::{ApiKind, Ports, Site};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Site used when the first token is not a site keyword.
    #[serde(default)]
    pub default_site: Site,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub services: Services,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_site: Site::default(),
            timeout: default_timeout(),
            services: Services::default(),
        }
    }
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Per-service settings, keyed by API family.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Services {
    pub control: Service,
    pub unit: Service,
    pub spec: Service,
    pub safety: Service,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            control: Service::for_kind(ApiKind::Control),
            unit: Service::for_kind(ApiKind::Unit),
            spec: Service::for_kind(ApiKind::Spec),
            safety: Service::for_kind(ApiKind::Safety),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Service {
    pub port: u16,
}

impl Service {
    fn for_kind(kind: ApiKind) -> Self {
        Self {
            port: kind.default_port(),
        }
    }
}

impl Config {
    /// Port table for endpoint construction.
    pub fn ports(&self) -> Ports {
        Ports {
            control: self.services.control.port,
            unit: self.services.unit.port,
            spec: self.services.spec.port,
            safety: self.services.safety.port,
        }
    }

    /// Render as pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("il.ac", "weizmann", "mast").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("mast");
    p
}

// ── Config loading ──────────────────────────────────────────────────

fn figment_for(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("MAST_").split("__"))
}

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config layering the given TOML file (missing is fine) and env.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    Ok(figment_for(path).extract()?)
}
