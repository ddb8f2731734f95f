use billwatch_client::commands;
use billwatch_client::{ClientResult, SuccessEnvelope};

use crate::cli::{Cli, Commands};

pub fn dispatch(cli: &Cli) -> ClientResult<SuccessEnvelope> {
    match &cli.command {
        Commands::Import {
            dry_run,
            json: _,
            path,
        } => commands::import::run(path.clone(), *dry_run),
        Commands::Recurring { as_of, .. } => {
            let as_of_value = as_of.as_ref().map(|value| value.as_str());
            commands::recurring::run(as_of_value)
        }
    }
}
