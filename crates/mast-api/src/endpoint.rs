// Endpoint descriptors and URL construction.
//
// Requests are `http://<host>:<port>/mast/api/v1/<kind>/<path>`, except
// the safety service which serves its routes from the root. The host comes
// from the target (site-scoped for controller/spec/safety, verbatim for
// units) and the port from the per-kind `Ports` table.

use strum::{AsRefStr, Display};
use tracing::trace;
use url::Url;

use crate::error::Error;
use crate::site::Site;

/// The MAST API families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ApiKind {
    Control,
    Unit,
    Spec,
    Safety,
}

impl ApiKind {
    /// Fixed path prefix, without leading or trailing slash. Empty for safety.
    pub fn path_prefix(self) -> &'static str {
        match self {
            Self::Control => "mast/api/v1/control",
            Self::Unit => "mast/api/v1/unit",
            Self::Spec => "mast/api/v1/spec",
            Self::Safety => "",
        }
    }

    /// Port the service listens on in a stock deployment.
    pub fn default_port(self) -> u16 {
        match self {
            Self::Control => 8002,
            Self::Unit => 8000,
            Self::Spec | Self::Safety => 8001,
        }
    }
}

/// Per-kind port table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ports {
    pub control: u16,
    pub unit: u16,
    pub spec: u16,
    pub safety: u16,
}

impl Default for Ports {
    fn default() -> Self {
        Self {
            control: ApiKind::Control.default_port(),
            unit: ApiKind::Unit.default_port(),
            spec: ApiKind::Spec.default_port(),
            safety: ApiKind::Safety.default_port(),
        }
    }
}

impl Ports {
    pub fn port_for(self, kind: ApiKind) -> u16 {
        match kind {
            ApiKind::Control => self.control,
            ApiKind::Unit => self.unit,
            ApiKind::Spec => self.spec,
            ApiKind::Safety => self.safety,
        }
    }
}

/// A logical request target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// The site controller, `mast-<site>-control`.
    Controller(Site),
    /// An individual unit, addressed by a caller-supplied host name.
    Unit(String),
    /// The site spectrograph service, `mast-<site>-spec`.
    Spec(Site),
    /// The site safety service, `mast-<site>-safety`.
    Safety(Site),
}

impl Target {
    pub fn kind(&self) -> ApiKind {
        match self {
            Self::Controller(_) => ApiKind::Control,
            Self::Unit(_) => ApiKind::Unit,
            Self::Spec(_) => ApiKind::Spec,
            Self::Safety(_) => ApiKind::Safety,
        }
    }

    /// Host name the target resolves to.
    pub fn host(&self) -> String {
        match self {
            Self::Controller(site) => format!("mast-{site}-control"),
            Self::Unit(host) => host.clone(),
            Self::Spec(site) => format!("mast-{site}-spec"),
            Self::Safety(site) => format!("mast-{site}-safety"),
        }
    }
}

/// A fully resolved host, port and path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub kind: ApiKind,
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn for_target(target: &Target, ports: &Ports) -> Result<Self, Error> {
        let host = target.host();
        if !is_usable_host(&host) {
            return Err(Error::InvalidHost { host });
        }
        let kind = target.kind();
        Ok(Self {
            kind,
            host,
            port: ports.port_for(kind),
        })
    }

    /// `http://<host>:<port>/mast/api/v1/<kind>`, or `http://<host>:<port>`
    /// for kinds without a prefix.
    pub fn base_url(&self) -> String {
        match self.kind.path_prefix() {
            "" => format!("http://{}:{}", self.host, self.port),
            prefix => format!("http://{}:{}/{prefix}", self.host, self.port),
        }
    }

    /// Append the `/`-joined path segments to the base URL.
    ///
    /// Segments may already contain slashes (`a/b`); they are kept as-is.
    pub fn url<S: AsRef<str>>(&self, segments: &[S]) -> Result<Url, Error> {
        let joined = segments
            .iter()
            .map(<S as AsRef<str>>::as_ref)
            .collect::<Vec<_>>()
            .join("/");
        let path = joined.trim_matches('/');
        if path.is_empty() {
            return Err(Error::EmptyPath {
                kind: self.kind.to_string(),
            });
        }

        let url = Url::parse(&format!("{}/{path}", self.base_url()))?;
        trace!(%url, "built endpoint URL");
        Ok(url)
    }

    /// Like [`Endpoint::url`], then append `params` as the query string.
    pub fn url_with_query<S, K, V>(&self, segments: &[S], params: &[(K, V)]) -> Result<Url, Error>
    where
        S: AsRef<str>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut url = self.url(segments)?;
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (k.as_ref(), v.as_ref())));
        }
        Ok(url)
    }
}

fn is_usable_host(host: &str) -> bool {
    !host.is_empty()
        && !host
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | ':' | '@' | '?' | '#'))
}
