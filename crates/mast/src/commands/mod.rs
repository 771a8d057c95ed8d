//! Command dispatch: bridges CLI args -> endpoint resolution -> output formatting.

pub mod api;
pub mod config_cmd;

use clap::CommandFactory;

use crate::cli::{Cli, Command, CompletionsArgs, GlobalOpts};
use crate::error::CliError;

/// Dispatch a parsed command to its handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Controller(args) => api::controller(&args, global).await,
        Command::Unit(args) => api::unit(args, global).await,
        Command::Spec(args) => api::spec(&args, global).await,
        Command::Safety(args) => api::safety(&args, global).await,
        Command::Config(args) => config_cmd::handle(&args),
        Command::Completions(args) => {
            completions(&args);
            Ok(())
        }
    }
}

fn completions(args: &CompletionsArgs) {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "mast", &mut std::io::stdout());
}
