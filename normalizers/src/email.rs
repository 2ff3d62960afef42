use regex::Regex;
use shared_types::LOCKED_EMAIL_SENTINEL;
use std::sync::OnceLock;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

pub fn is_locked_sentinel(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case(LOCKED_EMAIL_SENTINEL)
}

/// Trim an email candidate, rejecting the locked sentinel and anything that
/// is not shaped like an address. Case is preserved.
pub fn sanitize_email(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || is_locked_sentinel(trimmed) {
        return None;
    }
    if !email_pattern().is_match(trimmed) {
        tracing::debug!("Discarding malformed email value: {}", trimmed);
        return None;
    }
    Some(trimmed.to_string())
}
