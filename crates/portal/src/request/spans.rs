//! Route names for request spans.

/// Replace signing tokens in `path` so they never reach the logs.
///
/// `/contracts/abc123/sign` becomes `/contracts/{token}/sign`.
pub(super) fn redact_signing_tokens(path: &str) -> String {
    let mut redacted = String::with_capacity(path.len());
    let mut previous = "";

    for (index, segment) in path.trim_start_matches('/').split('/').enumerate() {
        redacted.push('/');

        if index > 0 && previous == "contracts" && !segment.is_empty() {
            redacted.push_str("{token}");
        } else {
            redacted.push_str(segment);
        }

        previous = segment;
    }

    redacted
}
