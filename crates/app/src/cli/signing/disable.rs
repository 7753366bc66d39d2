use std::io::{self, BufRead, Write};

use clap::Args;
use countersign_app::{
    context::AppContext,
    signing::{AssumeYes, Confirmation, DisableOutcome},
};

use crate::cli::{output::print_progress, signing::ContractRef};

#[derive(Debug, Args)]
pub(crate) struct DisableSigningArgs {
    #[command(flatten)]
    contract: ContractRef,

    /// Skip the confirmation prompt
    #[arg(long)]
    yes: bool,
}

/// Asks on stderr and reads the answer from stdin.
struct TerminalPrompt;

impl Confirmation for TerminalPrompt {
    fn confirm(&self, prompt: &str) -> bool {
        let mut stderr = io::stderr().lock();

        if write!(stderr, "{prompt} [y/N] ").and_then(|()| stderr.flush()).is_err() {
            return false;
        }

        let mut answer = String::new();

        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }

        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

pub(crate) async fn run(context: &AppContext, args: DisableSigningArgs) -> Result<(), String> {
    let mut management = args.contract.load(context).await?;

    let confirmation: &dyn Confirmation = if args.yes { &AssumeYes } else { &TerminalPrompt };

    let outcome = management
        .disable_signing(confirmation)
        .await
        .map_err(|error| format!("failed to disable signing: {error}"))?;

    match outcome {
        DisableOutcome::Declined => println!("cancelled; signing is unchanged"),
        DisableOutcome::Disabled => {
            println!("public signing disabled");
            print_progress(&management.progress());
        }
    }

    Ok(())
}
