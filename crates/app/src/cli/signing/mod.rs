use clap::{Args, Subcommand};
use countersign::signatures::ResourceId;
use countersign_app::{
    context::AppContext,
    signing::SigningManagement,
};

mod disable;
mod enable;
mod status;

#[derive(Debug, Args)]
pub(crate) struct SigningCommand {
    #[command(subcommand)]
    command: SigningSubcommand,
}

#[derive(Debug, Subcommand)]
enum SigningSubcommand {
    /// Enable public signing and print the signing URL
    Enable(enable::EnableSigningArgs),

    /// Disable public signing; collected signatures are kept
    Disable(disable::DisableSigningArgs),

    /// Show the signing status
    Status(status::SigningStatusArgs),
}

/// Identifies a contract on the company-side endpoints.
#[derive(Debug, Args)]
pub(crate) struct ContractRef {
    /// Candidate id
    #[arg(long)]
    candidate: String,

    /// Contract id
    #[arg(long)]
    contract: String,
}

impl ContractRef {
    async fn load(self, context: &AppContext) -> Result<SigningManagement, String> {
        SigningManagement::load(
            context.signing.clone(),
            ResourceId::new(self.candidate),
            ResourceId::new(self.contract),
            context.retry,
        )
        .await
        .map_err(|error| format!("failed to load signing status: {error}"))
    }
}

pub(crate) async fn run(context: &AppContext, command: SigningCommand) -> Result<(), String> {
    match command.command {
        SigningSubcommand::Enable(args) => enable::run(context, args).await,
        SigningSubcommand::Disable(args) => disable::run(context, args).await,
        SigningSubcommand::Status(args) => status::run(context, args).await,
    }
}
