use std::path::{Path, PathBuf};

use clap::Args;
use countersign::{eligibility::SignerEligibility, signature_pad::Point};
use countersign_app::{
    context::AppContext,
    signing::{PagePhase, PublicSigningPage},
};
use tracing::warn;

use crate::cli::output::print_progress;

#[derive(Debug, Args)]
pub(crate) struct SignContractArgs {
    /// Signing token from the public signing URL
    token: String,

    /// Signer's full name
    #[arg(long)]
    name: String,

    /// Signer's email address
    #[arg(long)]
    email: String,

    /// JSON file with strokes: [[[x, y], ...], ...]
    #[arg(long)]
    strokes: PathBuf,
}

pub(crate) async fn run(context: &AppContext, args: SignContractArgs) -> Result<(), String> {
    let strokes = read_strokes(&args.strokes)?;

    let mut page = PublicSigningPage::load(context.contracts.clone(), args.token, context.retry)
        .await
        .map_err(|error| format!("failed to load contract: {error}"))?;

    match page.phase() {
        PagePhase::Open => {}
        PagePhase::NotFound => {
            return Err(
                "contract not found: the signing link is invalid or was withdrawn".to_string(),
            );
        }
        PagePhase::Completed => return Err("contract is already fully signed".to_string()),
        PagePhase::Closed(status) => {
            return Err(format!("contract is not accepting signatures ({status})"));
        }
    }

    page.set_signer(args.name, args.email);

    let eligibility = page.open_signature_pad().map_err(|error| error.to_string())?;

    if eligibility == SignerEligibility::NotRequired {
        eprintln!("note: this email is not on the required signer list");
    }

    let pad = page
        .pad_mut()
        .ok_or_else(|| "signature pad is not available".to_string())?;

    for stroke in strokes {
        let mut points = stroke.into_iter().map(Point::from);

        let Some(first) = points.next() else {
            continue;
        };

        pad.pointer_down(first);

        for point in points {
            pad.pointer_move(point);
        }

        pad.pointer_up();
    }

    let outcome = page
        .submit()
        .await
        .map_err(|error| format!("failed to sign contract: {error}"))?;

    println!("signed");

    let progress = match page.refresh().await {
        Ok(_) => page.progress().unwrap_or(outcome.progress),
        Err(error) => {
            warn!("could not refresh signing status: {error}");

            outcome.progress
        }
    };

    print_progress(&progress);

    if outcome.receipt.fully_signed {
        println!("contract is fully signed");
    }

    Ok(())
}

fn read_strokes(path: &Path) -> Result<Vec<Vec<[f32; 2]>>, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|error| format!("failed to read {}: {error}", path.display()))?;

    serde_json::from_str(&contents)
        .map_err(|error| format!("invalid strokes in {}: {error}", path.display()))
}
