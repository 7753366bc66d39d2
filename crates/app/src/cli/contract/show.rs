use clap::Args;
use countersign_app::{
    context::AppContext,
    signing::{PagePhase, PublicSigningPage},
};

use crate::cli::output::{print_progress, print_signatures};

#[derive(Debug, Args)]
pub(crate) struct ShowContractArgs {
    /// Signing token from the public signing URL
    token: String,
}

pub(crate) async fn run(context: &AppContext, args: ShowContractArgs) -> Result<(), String> {
    let page = PublicSigningPage::load(context.contracts.clone(), args.token, context.retry)
        .await
        .map_err(|error| format!("failed to load contract: {error}"))?;

    let (Some(contract), Some(progress)) = (page.contract(), page.progress()) else {
        return Err("contract not found: the signing link is invalid or was withdrawn".to_string());
    };

    println!("contract: {} ({})", contract.name, contract.id);

    if let Some(candidate) = &contract.candidate {
        println!("candidate: {candidate}");
    }

    if let Some(company) = &contract.company {
        println!("company: {company}");
    }

    print_progress(&progress);

    if let Some(session) = page.session() {
        print_signatures(&session.snapshot().signatures);
    }

    match page.phase() {
        PagePhase::Completed => println!("all required signers have signed"),
        PagePhase::Closed(status) => println!("not accepting signatures ({status})"),
        PagePhase::Open | PagePhase::NotFound => {}
    }

    Ok(())
}
