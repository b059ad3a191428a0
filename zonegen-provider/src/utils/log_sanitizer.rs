//! Log sanitization utilities
//!
//! Response bodies, TXT values and signing material end up in debug logs.
//! These helpers bound their size and keep credentials out.

/// Maximum number of characters kept by [`truncate_for_log`].
const LOG_CHAR_LIMIT: usize = 256;

/// Canonical headers whose value is a credential.
const SECRET_HEADERS: &[&str] = &["x-amz-security-token"];

/// Characters of a secret left visible by [`mask_secret`].
const VISIBLE_PREFIX: usize = 4;

/// Cut `s` to the first `LOG_CHAR_LIMIT` characters, noting how much was dropped.
pub fn truncate_for_log(s: &str) -> String {
    match s.char_indices().nth(LOG_CHAR_LIMIT) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}... [{} more bytes]", &s[..cut], s.len() - cut),
    }
}

/// `AKIA****` style masking of an access key or token.
pub fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(VISIBLE_PREFIX).collect();
    let hidden = secret.chars().count().saturating_sub(VISIBLE_PREFIX);
    format!("{visible}{}", "*".repeat(hidden.min(8)))
}

/// Blank out credential header values in a SigV4 canonical request.
pub fn redact_canonical_request(canonical: &str) -> String {
    canonical
        .lines()
        .map(|line| match line.split_once(':') {
            Some((name, _)) if SECRET_HEADERS.contains(&name) => format!("{name}:<redacted>"),
            _ => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
