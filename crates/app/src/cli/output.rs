use countersign::{signatures::Signature, status::SigningProgress};

pub(crate) fn print_progress(progress: &SigningProgress) {
    println!("status: {}", progress.status);
    println!("progress: {}%", progress.progress);

    if !progress.matched_signers.is_empty() {
        println!("signed: {}", progress.matched_signers.join(", "));
    }

    if !progress.remaining_signers.is_empty() {
        println!("remaining: {}", progress.remaining_signers.join(", "));
    }

    if !progress.extra_signers.is_empty() {
        println!("also signed: {}", progress.extra_signers.join(", "));
    }
}

pub(crate) fn print_signatures(signatures: &[Signature]) {
    for signature in signatures {
        println!(
            "  {} <{}> at {}",
            signature.signer_name, signature.signer_email, signature.signed_at
        );
    }
}
