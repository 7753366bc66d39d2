use clap::Args;
use countersign_app::context::AppContext;

use crate::cli::{output::print_progress, signing::ContractRef};

#[derive(Debug, Args)]
pub(crate) struct EnableSigningArgs {
    #[command(flatten)]
    contract: ContractRef,

    /// Candidate's email; always the first required signer
    #[arg(long)]
    candidate_email: String,

    /// Additional signer emails, separated by commas, semicolons or newlines
    #[arg(long, default_value = "")]
    signers: String,
}

pub(crate) async fn run(context: &AppContext, args: EnableSigningArgs) -> Result<(), String> {
    let mut management = args.contract.load(context).await?;

    let signing_url = management
        .enable_signing(&args.candidate_email, &args.signers)
        .await
        .map_err(|error| format!("failed to enable signing: {error}"))?
        .to_string();

    println!("signing_url: {signing_url}");
    print_progress(&management.progress());

    Ok(())
}
