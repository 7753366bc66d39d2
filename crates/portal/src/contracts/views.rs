//! Server-rendered HTML for the signing page.

use countersign::{
    signature_pad::PadOptions,
    signatures::Signature,
    signers::normalize_email,
    status::{SigningProgress, SigningStatus},
};
use countersign_app::signing::{PagePhase, PublicSigningPage};
use leptos::prelude::*;

const STYLE: &str = r"
body { font-family: system-ui, sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; color: #1f2933; }
header p { color: #52606d; margin: 0.25rem 0; }
article { border: 1px solid #d9e2ec; border-radius: 6px; padding: 1rem 1.5rem; margin: 1.5rem 0; }
.progress { background: #e4e7eb; border-radius: 4px; height: 0.75rem; overflow: hidden; }
.progress span { display: block; height: 100%; background: #2f855a; }
.notice { padding: 0.75rem 1rem; border-radius: 4px; background: #fffbea; border: 1px solid #f0b429; }
.error { color: #ba2525; }
canvas { border: 1px dashed #9aa5b1; border-radius: 4px; touch-action: none; background: #fff; }
label { display: block; margin: 0.5rem 0; }
input { width: 100%; padding: 0.4rem; }
";

const SIGNING_SCRIPT: &str = r"
(function () {
  const form = document.getElementById('signing-form');
  const panel = document.getElementById('signature-panel');
  const openPad = document.getElementById('open-signature-pad');
  const advisory = document.getElementById('signer-advisory');
  const message = document.getElementById('form-message');
  const submit = document.getElementById('submit-signature');
  const canvas = document.getElementById('signature-pad');
  const ctx = canvas.getContext('2d');
  const listed = (key) => (form.dataset[key] || '').split(' ').filter(Boolean);
  const required = listed('requiredSigners');
  const signed = listed('signedSigners');
  let strokes = [];
  let drawing = false;

  function redraw() {
    ctx.clearRect(0, 0, canvas.width, canvas.height);
    ctx.lineWidth = Number(canvas.dataset.penWidth);
    ctx.lineCap = 'round';
    ctx.lineJoin = 'round';
    for (const stroke of strokes) {
      ctx.beginPath();
      stroke.forEach((p, i) => (i === 0 ? ctx.moveTo(p.x, p.y) : ctx.lineTo(p.x, p.y)));
      if (stroke.length === 1) ctx.lineTo(stroke[0].x + 0.1, stroke[0].y);
      ctx.stroke();
    }
  }

  function closePad() {
    panel.hidden = true;
    strokes = [];
    redraw();
  }

  function signer() {
    return {
      name: form.signer_name.value.trim(),
      email: form.signer_email.value.trim().toLowerCase(),
    };
  }

  function updateGate() {
    const { name, email } = signer();
    const alreadySigned = email !== '' && signed.includes(email);
    message.textContent = alreadySigned ? 'This email has already signed this contract.' : '';
    advisory.hidden = alreadySigned || email === '' || required.length === 0 || required.includes(email);
    openPad.disabled = name === '' || email === '' || alreadySigned;
    if (openPad.disabled) closePad();
  }

  function point(event) {
    const rect = canvas.getBoundingClientRect();
    return {
      x: (event.clientX - rect.left) * (canvas.width / rect.width),
      y: (event.clientY - rect.top) * (canvas.height / rect.height),
    };
  }

  form.signer_name.addEventListener('input', updateGate);
  form.signer_email.addEventListener('input', updateGate);
  openPad.addEventListener('click', () => {
    if (!openPad.disabled) panel.hidden = false;
  });

  canvas.addEventListener('pointerdown', (event) => {
    if (panel.hidden) return;
    drawing = true;
    canvas.setPointerCapture(event.pointerId);
    strokes.push([point(event)]);
    redraw();
  });
  canvas.addEventListener('pointermove', (event) => {
    if (!drawing) return;
    strokes[strokes.length - 1].push(point(event));
    redraw();
  });
  ['pointerup', 'pointercancel'].forEach((name) =>
    canvas.addEventListener(name, () => (drawing = false)));

  document.getElementById('clear-signature').addEventListener('click', () => {
    strokes = [];
    redraw();
  });
  document.getElementById('undo-signature').addEventListener('click', () => {
    strokes.pop();
    redraw();
  });

  form.addEventListener('submit', async (event) => {
    event.preventDefault();
    if (panel.hidden || strokes.length === 0) {
      message.textContent = 'Please draw your signature first.';
      return;
    }
    message.textContent = '';
    submit.disabled = true;
    try {
      const response = await fetch(window.location.pathname, {
        method: 'POST',
        headers: { 'content-type': 'application/json', accept: 'application/json' },
        body: JSON.stringify({
          signer_name: form.signer_name.value,
          signer_email: form.signer_email.value,
          strokes,
        }),
      });
      const body = await response.json().catch(() => null);
      if (response.ok) {
        if (body && body.not_required_signer) {
          advisory.hidden = false;
          message.textContent = 'Your signature was recorded.';
          setTimeout(() => window.location.reload(), 3000);
        } else {
          window.location.reload();
        }
        return;
      }
      message.textContent = (body && body.error && body.error.brief) || 'Signing failed. Please try again.';
    } catch (_) {
      message.textContent = 'Network error. Please try again.';
    }
    submit.disabled = false;
  });

  updateGate();
})();
";

/// Shown beside the form when the typed email is not on the required list.
const NOT_REQUIRED_ADVISORY: &str =
    "This email is not on the list of required signers. You can still sign.";

fn render_document<V: IntoView>(page: impl FnOnce() -> V) -> String {
    let html = Owner::new().with(|| page().to_html());

    format!("<!DOCTYPE html>\n{html}")
}

#[component]
fn Document(#[prop(into)] title: String, children: Children) -> impl IntoView {
    view! {
        <html lang="en">
            <head>
                <meta charset="utf-8" />
                <meta name="viewport" content="width=device-width, initial-scale=1" />
                <title>{title}</title>
                <style inner_html=STYLE></style>
            </head>
            <body>{children()}</body>
        </html>
    }
}

/// Dead-end page for unknown or withdrawn links.
pub(crate) fn not_found_page() -> String {
    render_document(|| {
        view! {
            <Document title="Contract not found">
                <h1>"Contract not found"</h1>
                <p>
                    "This signing link is invalid or has been withdrawn. Please contact the sender for a new link."
                </p>
            </Document>
        }
    })
}

/// Shown when the backend cannot be reached.
pub(crate) fn unavailable_page(message: &str) -> String {
    let message = message.to_string();

    render_document(move || {
        view! {
            <Document title="Signing unavailable">
                <h1>"Signing is temporarily unavailable"</h1>
                <p class="error">{message}</p>
            </Document>
        }
    })
}

/// The signing page for a loaded contract.
pub(crate) fn signing_page(page: &PublicSigningPage, pad: PadOptions) -> String {
    let (Some(contract), Some(progress), Some(session)) =
        (page.contract(), page.progress(), page.session())
    else {
        return not_found_page();
    };

    let phase = page.phase();

    if phase == PagePhase::NotFound {
        return not_found_page();
    }

    let snapshot = session.snapshot();
    let title = contract.name.clone();
    let heading = contract.name.clone();
    let company = contract.company.clone();
    let candidate = contract.candidate.clone();
    // Rendered by the backend from the contract template.
    let body_html = contract.rendered_html.clone();
    let required_signers = snapshot.required_signers;
    let signatures = snapshot.signatures;

    render_document(move || {
        view! {
            <Document title=title>
                <header>
                    <h1>{heading}</h1>
                    {company.map(|company| view! { <p>{format!("From {company}")}</p> })}
                    {candidate.map(|candidate| view! { <p>{format!("For {candidate}")}</p> })}
                </header>
                <article inner_html=body_html></article>
                <ProgressSection progress=progress />
                <SignatureList signatures=signatures.clone() />
                {match phase {
                    PagePhase::Open => {
                        view! {
                            <SigningForm
                                pad=pad
                                required_signers=required_signers
                                signatures=signatures
                            />
                        }
                            .into_any()
                    }
                    PagePhase::Completed => {
                        view! {
                            <p class="notice">
                                "All required signers have signed this contract. Thank you."
                            </p>
                        }
                            .into_any()
                    }
                    PagePhase::Closed(status) => {
                        view! {
                            <p class="notice">
                                {format!(
                                    "This contract is not accepting signatures ({}).",
                                    status_label(status),
                                )}
                            </p>
                        }
                            .into_any()
                    }
                    PagePhase::NotFound => ().into_any(),
                }}
            </Document>
        }
    })
}

fn status_label(status: SigningStatus) -> &'static str {
    match status {
        SigningStatus::SigningDisabled => "signing disabled",
        SigningStatus::OpenForSigning => "open for signing",
        SigningStatus::PartiallySigned => "partially signed",
        SigningStatus::FullySigned => "fully signed",
    }
}

/// Space-separated, normalised emails for the page script.
fn email_list<'a>(emails: impl IntoIterator<Item = &'a str>) -> String {
    emails
        .into_iter()
        .map(normalize_email)
        .filter(|email| !email.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[component]
fn ProgressSection(progress: SigningProgress) -> impl IntoView {
    let percent = progress.progress.to_string();
    let waiting_for = (!progress.remaining_signers.is_empty())
        .then(|| format!("Waiting for: {}", progress.remaining_signers.join(", ")));

    view! {
        <section id="signing-status" data-status=progress.status.to_string()>
            <h2>{format!("Status: {}", status_label(progress.status))}</h2>
            <div
                class="progress"
                role="progressbar"
                aria-valuemin="0"
                aria-valuemax="100"
                aria-valuenow=percent.clone()
            >
                <span style=format!("width: {percent}%")></span>
            </div>
            <p>{format!("{percent}% signed")}</p>
            {waiting_for.map(|text| view! { <p>{text}</p> })}
        </section>
    }
}

#[component]
fn SignatureList(signatures: Vec<Signature>) -> impl IntoView {
    (!signatures.is_empty()).then(|| {
        view! {
            <section id="signatures">
                <h2>"Signatures"</h2>
                <ul>
                    {signatures
                        .into_iter()
                        .map(|signature| {
                            view! {
                                <li>
                                    {format!(
                                        "{} <{}> signed at {}",
                                        signature.signer_name,
                                        signature.signer_email,
                                        signature.signed_at,
                                    )}
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
            </section>
        }
    })
}

/// Signer form. The pad stays hidden and its opener disabled until both
/// fields hold non-blank text; the page script lifts the lock.
#[component]
fn SigningForm(
    pad: PadOptions,
    required_signers: Vec<String>,
    signatures: Vec<Signature>,
) -> impl IntoView {
    let required = email_list(required_signers.iter().map(String::as_str));
    let signed = email_list(
        signatures
            .iter()
            .map(|signature| signature.signer_email.as_str()),
    );

    view! {
        <form id="signing-form" data-required-signers=required data-signed-signers=signed>
            <h2>"Sign this contract"</h2>
            <label>
                "Full name" <input name="signer_name" autocomplete="name" required=true />
            </label>
            <label>
                "Email"
                <input name="signer_email" type="email" autocomplete="email" required=true />
            </label>
            <p id="signer-advisory" class="notice" role="status" hidden=true>
                {NOT_REQUIRED_ADVISORY}
            </p>
            <button type="button" id="open-signature-pad" disabled=true>
                "Open signature pad"
            </button>
            <div id="signature-panel" hidden=true>
                <canvas
                    id="signature-pad"
                    width=pad.width.to_string()
                    height=pad.height.to_string()
                    data-pen-width=pad.pen_width.to_string()
                ></canvas>
                <p>
                    <button type="button" id="undo-signature">"Undo"</button>
                    <button type="button" id="clear-signature">"Clear"</button>
                    <button type="submit" id="submit-signature">"Sign"</button>
                </p>
            </div>
            <p id="form-message" class="error" role="alert"></p>
        </form>
        <script inner_html=SIGNING_SCRIPT></script>
    }
}
