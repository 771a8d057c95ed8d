// mast-api: Async client for the MAST controller, unit, spec and safety REST APIs

pub mod canonical;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod site;
pub mod transport;

pub use canonical::CanonicalResponse;
pub use client::MastClient;
pub use endpoint::{ApiKind, Endpoint, Ports, Target};
pub use error::Error;
pub use site::{Site, SiteSelection};
pub use transport::TransportConfig;
