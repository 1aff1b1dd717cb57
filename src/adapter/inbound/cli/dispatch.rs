//! Command dispatch.

use super::command::{Cli, Commands, ConfigCommand};
use super::output::{self, OutputConfig};
use super::{config, serve, team};

use crate::error::Result;

/// Configure output from the global flags and run the selected command.
///
/// # Errors
/// Returns whatever error ended the command.
pub async fn run(cli: Cli) -> Result<()> {
    output::configure(
        OutputConfig {
            json: cli.json,
            quiet: cli.quiet,
        },
        cli.color,
    );

    match &cli.command {
        Commands::Serve(args) => serve::execute(args).await,
        Commands::Config(ConfigCommand::Init(args)) => config::execute_init(&args.path, args.force),
        Commands::Config(ConfigCommand::Show(args)) => config::execute_show(&args.config),
        Commands::Config(ConfigCommand::Validate(args)) => config::execute_validate(&args.config),
        Commands::Team(args) => team::execute(args).await,
    }
}
