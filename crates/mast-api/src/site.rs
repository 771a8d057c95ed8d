// Site selection for site-scoped APIs (controller, spec).
//
// The first caller token is either a site keyword or the first path
// segment. `SiteSelection` makes that decision explicit.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// A MAST deployment site.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Site {
    /// Weizmann Institute site.
    #[default]
    Wis,
    /// Neot Smadar site.
    Ns,
}

impl Site {
    /// Parse a caller token as a site keyword. Matching is exact.
    pub fn from_token(token: &str) -> Option<Self> {
        token.parse().ok()
    }
}

/// Outcome of splitting caller tokens into a site and path segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteSelection {
    pub site: Site,
    /// `true` when the site came from a keyword token or an explicit flag,
    /// `false` when the fallback was used.
    pub explicit: bool,
    pub path: Vec<String>,
}

impl SiteSelection {
    /// Split tokens using `Site::default()` as the fallback site.
    pub fn from_tokens(tokens: &[String]) -> Self {
        Self::parse(tokens, Site::default())
    }

    /// Consume the first token as the site if it is a site keyword;
    /// otherwise use `fallback` and keep every token as a path segment.
    pub fn parse(tokens: &[String], fallback: Site) -> Self {
        match tokens.split_first() {
            Some((first, rest)) => match Site::from_token(first) {
                Some(site) => Self {
                    site,
                    explicit: true,
                    path: rest.to_vec(),
                },
                None => Self {
                    site: fallback,
                    explicit: false,
                    path: tokens.to_vec(),
                },
            },
            None => Self {
                site: fallback,
                explicit: false,
                path: Vec::new(),
            },
        }
    }

    /// Use an explicitly chosen site; no token is treated as a site keyword.
    pub fn with_site(site: Site, tokens: &[String]) -> Self {
        Self {
            site,
            explicit: true,
            path: tokens.to_vec(),
        }
    }
}
