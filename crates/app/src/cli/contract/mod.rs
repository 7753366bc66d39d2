use clap::{Args, Subcommand};
use countersign_app::context::AppContext;

mod show;
mod sign;

#[derive(Debug, Args)]
pub(crate) struct ContractCommand {
    #[command(subcommand)]
    command: ContractSubcommand,
}

#[derive(Debug, Subcommand)]
enum ContractSubcommand {
    /// Show a contract and its signing status
    Show(show::ShowContractArgs),

    /// Sign a contract with strokes recorded in a JSON file
    Sign(sign::SignContractArgs),
}

pub(crate) async fn run(context: &AppContext, command: ContractCommand) -> Result<(), String> {
    match command.command {
        ContractSubcommand::Show(args) => show::run(context, args).await,
        ContractSubcommand::Sign(args) => sign::run(context, args).await,
    }
}
