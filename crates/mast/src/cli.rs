//! Clap derive structures for the `mast` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. This
//! file is also compiled by `build.rs` for man-page generation, so it must
//! only depend on clap and clap_complete.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// mast -- query MAST controller, unit, spec and safety REST APIs
#[derive(Debug, Parser)]
#[command(
    name = "mast",
    version,
    about = "Query MAST controller, unit, spec and safety REST APIs",
    long_about = "Builds the URL for a MAST service, issues a single HTTP GET and\n\
        prints the JSON response.\n\n\
        Endpoints:\n  \
          controller  http://mast-<site>-control:8002/mast/api/v1/control/<path>\n  \
          unit        http://<unit-host>:8000/mast/api/v1/unit/<path>\n  \
          spec        http://mast-<site>-spec:8001/mast/api/v1/spec/<path>\n  \
          safety      http://mast-<site>-safety:8001/<path>",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MAST_OUTPUT",
        default_value = "json",
        global = true
    )]
    pub output: OutputFormat,

    /// Print only the `value` of canonical MAST responses
    #[arg(long, global = true)]
    pub unwrap: bool,

    /// Print the resolved URL and exit without sending a request
    #[arg(long, global = true)]
    pub print_url: bool,

    /// Query parameter appended to the URL (repeatable)
    #[arg(
        long = "param",
        short = 'p',
        value_name = "KEY=VALUE",
        value_parser = parse_param,
        global = true
    )]
    pub params: Vec<(String, String)>,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "MAST_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors (the response body is still printed)
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

/// Split `key=value` at the first `=`. The value may be empty.
fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, _)) if key.is_empty() => Err(format!("missing key in '{raw}'")),
        Some((key, value)) => Ok((key.to_owned(), value.to_owned())),
        None => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SiteArg {
    /// Weizmann Institute
    Wis,
    /// Neot Smadar
    Ns,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// GET from the site controller API (port 8002)
    #[command(alias = "control", alias = "c")]
    Controller(SiteScopedArgs),

    /// GET from a unit's local API (port 8000)
    #[command(alias = "u")]
    Unit(UnitArgs),

    /// GET from the site spec API (port 8001)
    #[command(alias = "s")]
    Spec(SiteScopedArgs),

    /// GET from the site safety service (port 8001, no path prefix)
    Safety(SiteScopedArgs),

    /// Inspect configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── API Commands ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SiteScopedArgs {
    /// Site to address; when given, no path token is taken as a site
    #[arg(long, value_enum)]
    pub site: Option<SiteArg>,

    /// Optional site keyword (wis|ns) followed by path segments.
    /// A first token that is not a site keyword starts the path.
    #[arg(value_name = "[SITE] PATH", required = true, num_args = 1..)]
    pub tokens: Vec<String>,
}

#[derive(Debug, Args)]
pub struct UnitArgs {
    /// Unit host name, used verbatim (e.g. mast01)
    #[arg(value_name = "UNIT_HOST")]
    pub host: String,

    /// Path segments, joined with '/'
    #[arg(value_name = "PATH", required = true, num_args = 1..)]
    pub path: Vec<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration as TOML
    Show,
    /// Print the configuration file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
