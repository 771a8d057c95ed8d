//! Controller, unit, spec and safety handlers.
//!
//! Each handler resolves a `Target` and path, then performs exactly one GET.

use serde_json::Value;
use tracing::{debug, warn};

use mast_api::{CanonicalResponse, Endpoint, MastClient, Site, SiteSelection, Target};

use crate::cli::{GlobalOpts, SiteArg, SiteScopedArgs, UnitArgs};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

impl From<SiteArg> for Site {
    fn from(arg: SiteArg) -> Self {
        match arg {
            SiteArg::Wis => Site::Wis,
            SiteArg::Ns => Site::Ns,
        }
    }
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn controller(args: &SiteScopedArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load()?;
    let sel = select_site(args, cfg.default_site);
    run(&Target::Controller(sel.site), &sel.path, global, &cfg).await
}

pub async fn unit(args: UnitArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load()?;
    run(&Target::Unit(args.host), &args.path, global, &cfg).await
}

pub async fn spec(args: &SiteScopedArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load()?;
    let sel = select_site(args, cfg.default_site);
    run(&Target::Spec(sel.site), &sel.path, global, &cfg).await
}

pub async fn safety(args: &SiteScopedArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load()?;
    let sel = select_site(args, cfg.default_site);
    run(&Target::Safety(sel.site), &sel.path, global, &cfg).await
}

// ── Shared flow ─────────────────────────────────────────────────────

/// `--site` disables keyword sniffing on the positional tokens.
pub(crate) fn select_site(args: &SiteScopedArgs, fallback: Site) -> SiteSelection {
    match args.site {
        Some(site) => SiteSelection::with_site(site.into(), &args.tokens),
        None => SiteSelection::parse(&args.tokens, fallback),
    }
}

async fn run(
    target: &Target,
    path: &[String],
    global: &GlobalOpts,
    cfg: &Config,
) -> Result<(), CliError> {
    let url = Endpoint::for_target(target, &cfg.ports())?
        .url_with_query(path, &global.params)?;
    debug!(kind = %target.kind(), %url, "resolved request");

    if global.print_url {
        return output::print_output(url.as_str());
    }

    let client = MastClient::new(&config::transport(global, cfg))?;
    let body = client.fetch(url).await?;
    let body = if global.unwrap {
        unwrap_canonical(body)?
    } else {
        body
    };

    let rendered = output::render_value(global.output, &body)?;
    output::print_output(&rendered)
}

fn unwrap_canonical(body: Value) -> Result<Value, CliError> {
    if let Some(resp) = CanonicalResponse::detect(&body)? {
        return Ok(resp.into_result()?);
    }
    warn!("received a non-canonical response, printing it unchanged");
    Ok(body)
}
