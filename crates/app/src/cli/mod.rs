use clap::{Parser, Subcommand};
use countersign_app::{
    config::{ApiArgs, ApiConfig},
    context::AppContext,
    logging::{self, LoggingArgs},
};

mod contract;
mod output;
mod signing;

#[derive(Debug, Parser)]
#[command(name = "countersign", about = "Contract signing CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    api: ApiArgs,

    #[command(flatten)]
    logging: LoggingArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Public signing link actions
    Contract(contract::ContractCommand),

    /// Company-side signing management
    Signing(signing::SigningCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        logging::init(&self.logging)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        let context = AppContext::from_api_config(ApiConfig::from(self.api))
            .map_err(|error| format!("{error}: {}", error_source(&error)))?;

        match self.command {
            Commands::Contract(command) => contract::run(&context, command).await,
            Commands::Signing(command) => signing::run(&context, command).await,
        }
    }
}

fn error_source(error: &dyn std::error::Error) -> String {
    error
        .source()
        .map_or_else(|| "unknown cause".to_string(), ToString::to_string)
}
