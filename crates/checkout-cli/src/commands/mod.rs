mod policies;
mod run;

use std::path::Path;

use checkout_operations::CheckoutConfig;
use clap::Subcommand;

use crate::error::Result;

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Place one order as a saga and report how it ended
    Run(run::RunArgs),
    /// Show the effective retry policy of every operation
    Policies,
}

impl Commands {
    /// Returns whether the command succeeded; an aborted checkout is `Ok(false)`.
    pub(crate) fn execute(self, config_path: Option<&Path>) -> Result<bool> {
        let config = load_config(config_path)?;

        match self {
            Self::Run(args) => run::run(args, config),
            Self::Policies => {
                policies::run(&config);
                Ok(true)
            }
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<CheckoutConfig> {
    match path {
        Some(path) => Ok(CheckoutConfig::load(path)?),
        None => Ok(CheckoutConfig::default()),
    }
}
