//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::load()?;
            let rendered = cfg.to_toml().map_err(CliError::config)?;
            output::print_output(rendered.trim_end())
        }
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string())
        }
    }
}
