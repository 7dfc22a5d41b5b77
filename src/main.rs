// Entrypoint for the CLI application.
// Keeps `main` small: parse arguments, set up logging and configuration,
// then dispatch. A cancelled stopwatch is the only path that exits early.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};

use youtrack_cli::api::ApiClient;
use youtrack_cli::commands::{self, Outcome};
use youtrack_cli::stopwatch::SystemClock;
use youtrack_cli::terminal::Console;
use youtrack_cli::{git, logging, Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log = logging::init(cli.verbose);

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    if config.debug && !cli.verbose {
        log.enable_debug();
    }
    tracing::debug!(?cli, "parsed arguments");
    tracing::debug!(?config, "loaded configuration");

    let mut term = Console::new();
    let outcome = match &cli.command {
        Some(Commands::List) => {
            let api = ApiClient::from_config(&config)?;
            commands::list_issues(&mut term, &api, &config)?
        }
        Some(Commands::Issue { id, time }) => {
            let id = match id {
                Some(id) => id.clone(),
                None => {
                    let branch = git::current_branch()?;
                    git::issue_id_from_branch(&branch)
                        .with_context(|| format!("no issue id given and none found in branch {branch:?}"))?
                }
            };
            let api = ApiClient::from_config(&config)?;
            commands::show_issue(&mut term, &api, &config, &SystemClock, &id, *time)?
        }
        None => {
            Cli::command().print_help()?;
            println!();
            Outcome::Done
        }
    };

    if outcome == Outcome::Cancelled {
        std::process::exit(0);
    }
    Ok(())
}
