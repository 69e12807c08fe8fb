//! Secret redaction and truncation for log output.
//!
//! Upstream error strings can echo request URLs or headers. Everything that
//! reaches a log line or an error body passes through [`redact_secrets`].

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Replacement text for masked values
pub const REDACTED: &str = "[REDACTED]";

static QUERY_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)([?&](?:key|api_key|apikey|access_token|token)=)[^&\s#]+")
        .unwrap_or_else(|e| panic!("invalid query-key pattern: {e}"))
});

static BEARER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(bearer\s+)[A-Za-z0-9._~+/=-]+")
        .unwrap_or_else(|e| panic!("invalid bearer pattern: {e}"))
});

static API_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:sk-[A-Za-z0-9_-]{8,}|hf_[A-Za-z0-9]{8,}|AIza[0-9A-Za-z_-]{20,})")
        .unwrap_or_else(|e| panic!("invalid api-key pattern: {e}"))
});

/// Mask API keys, bearer tokens and key-bearing query parameters
#[must_use]
pub fn redact_secrets(input: &str) -> Cow<'_, str> {
    if !QUERY_KEY.is_match(input) && !BEARER.is_match(input) && !API_KEY.is_match(input) {
        return Cow::Borrowed(input);
    }

    let out = QUERY_KEY.replace_all(input, format!("${{1}}{REDACTED}"));
    let out = BEARER.replace_all(&out, format!("${{1}}{REDACTED}"));
    let out = API_KEY.replace_all(&out, REDACTED);
    Cow::Owned(out.into_owned())
}

/// Mask every literal occurrence of `secret`, then apply [`redact_secrets`].
///
/// Catches credentials whose shape none of the patterns know.
#[must_use]
pub fn redact_credential<'a>(input: &'a str, secret: &str) -> Cow<'a, str> {
    if secret.is_empty() || !input.contains(secret) {
        return redact_secrets(input);
    }
    Cow::Owned(redact_secrets(&input.replace(secret, REDACTED)).into_owned())
}

/// Truncate to at most `max_chars` characters, appending `…` when cut
#[must_use]
pub fn truncate_for_log(input: &str, max_chars: usize) -> Cow<'_, str> {
    match input.char_indices().nth(max_chars) {
        None => Cow::Borrowed(input),
        Some((idx, _)) => Cow::Owned(format!("{}…", &input[..idx])),
    }
}

/// Redact, then truncate
#[must_use]
pub fn sanitize_for_log(input: &str, max_chars: usize) -> String {
    truncate_for_log(&redact_secrets(input), max_chars).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_credential_masks_unknown_shapes() {
        let out = redact_credential("API key not valid: gemini-secret-123", "gemini-secret-123");
        assert_eq!(out, "API key not valid: [REDACTED]");

        let out = redact_credential("token abc and sk-zyxwvutsrqpo", "abc");
        assert!(!out.contains("abc"));
        assert!(!out.contains("sk-zyxwvutsrqpo"));

        assert_eq!(redact_credential("nothing here", ""), "nothing here");
    }

    #[test]
    fn test_redacts_query_key() {
        let msg = "error sending request for url (https://example.com/v1/models/x:generateContent?key=AIzaSECRET&alt=sse)";
        let out = redact_secrets(msg);
        assert!(!out.contains("AIzaSECRET"));
        assert!(out.contains("?key=[REDACTED]&alt=sse"));
    }

    #[test]
    fn test_redacts_bearer_token() {
        let out = redact_secrets("Authorization: Bearer abc.def-123");
        assert_eq!(out, "Authorization: Bearer [REDACTED]");
    }

    #[test]
    fn test_redacts_bare_keys() {
        let out = redact_secrets("invalid key sk-proj-abcdefghijkl and hf_abcdefghijklmnop");
        assert!(!out.contains("sk-proj"));
        assert!(!out.contains("hf_abcdefghijklmnop"));
        assert_eq!(out.matches(REDACTED).count(), 2);
    }

    #[test]
    fn test_clean_input_is_borrowed() {
        let out = redact_secrets("nothing to see");
        assert!(matches!(out, Cow::Borrowed(_)));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_for_log("short", 10), "short");
        assert_eq!(truncate_for_log("abcdef", 3), "abc…");
        // Bengali text is multi-byte
        assert_eq!(truncate_for_log("ধানের রোগ", 3), "ধান…");
    }

    #[test]
    fn test_sanitize_combines_both() {
        let out = sanitize_for_log("Bearer sk-abcdefghijklmnop failed badly", 20);
        assert!(!out.contains("sk-abc"));
        assert!(out.ends_with('…'));
    }
}
