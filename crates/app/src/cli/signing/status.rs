use clap::Args;
use countersign_app::context::AppContext;

use crate::cli::{
    output::{print_progress, print_signatures},
    signing::ContractRef,
};

#[derive(Debug, Args)]
pub(crate) struct SigningStatusArgs {
    #[command(flatten)]
    contract: ContractRef,
}

pub(crate) async fn run(context: &AppContext, args: SigningStatusArgs) -> Result<(), String> {
    let management = args.contract.load(context).await?;

    if let Some(url) = management.signing_url() {
        println!("signing_url: {url}");
    }

    print_progress(&management.progress());
    print_signatures(&management.session().snapshot().signatures);

    Ok(())
}
