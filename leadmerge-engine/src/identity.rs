use normalizers::email::is_locked_sentinel;
use shared_types::{CanonicalContact, DedupeKey};

/// Separates name and company in a name-based key; never appears in either.
pub const NAME_COMPANY_DELIMITER: char = '\u{1f}';

/// Derive the dedup key for a contact.
///
/// A present email yields an email-based key. Otherwise name and company form a
/// weaker name-based key, with no canonicalization of nicknames, initials or
/// legal suffixes. `None` when there is nothing to identify the contact by.
pub fn identity_key(contact: &CanonicalContact) -> Option<DedupeKey> {
    if let Some(email) = contact
        .email
        .as_deref()
        .map(str::trim)
        .filter(|email| !email.is_empty() && !is_locked_sentinel(email))
    {
        return Some(DedupeKey::email(email.to_lowercase()));
    }

    let name = normalized_part(contact.full_name.as_deref());
    let company = normalized_part(contact.company.as_deref());

    if name.is_empty() && company.is_empty() {
        return None;
    }

    Some(DedupeKey::name(format!(
        "{}{}{}",
        name, NAME_COMPANY_DELIMITER, company
    )))
}

fn normalized_part(value: Option<&str>) -> String {
    value
        .map(|v| v.trim().replace(NAME_COMPANY_DELIMITER, " ").to_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::KeyConfidence;

    fn contact(name: Option<&str>, company: Option<&str>, email: Option<&str>) -> CanonicalContact {
        CanonicalContact {
            full_name: name.map(str::to_string),
            company: company.map(str::to_string),
            email: email.map(str::to_string),
            ..CanonicalContact::new("Acme")
        }
    }

    #[test]
    fn test_email_key_is_trimmed_and_lowercased() {
        let key = identity_key(&contact(Some("Jo Lee"), None, Some("  Jo.Lee@X.com "))).unwrap();
        assert_eq!(key.value, "jo.lee@x.com");
        assert_eq!(key.confidence, KeyConfidence::EmailBased);
    }

    #[test]
    fn test_email_wins_over_name() {
        let a = identity_key(&contact(Some("Jo Lee"), Some("X"), Some("a@x.com"))).unwrap();
        let b = identity_key(&contact(Some("Joanna Lee"), Some("Y"), Some("A@X.COM"))).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_name_company_fallback() {
        let key = identity_key(&contact(Some(" Sam Ray "), Some("ACME"), None)).unwrap();
        assert_eq!(key.value, "sam ray\u{1f}acme");
        assert_eq!(key.confidence, KeyConfidence::NameBased);
    }

    #[test]
    fn test_delimiter_keeps_parts_apart() {
        let a = identity_key(&contact(Some("Sam"), Some("Ray Acme"), None)).unwrap();
        let b = identity_key(&contact(Some("Sam Ray"), Some("Acme"), None)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_partial_identity_still_keys() {
        assert!(identity_key(&contact(Some("Sam Ray"), None, None)).is_some());
        assert!(identity_key(&contact(None, Some("Acme"), None)).is_some());
    }

    #[test]
    fn test_no_identity() {
        assert!(identity_key(&contact(None, None, None)).is_none());
        assert!(identity_key(&contact(Some("  "), Some(""), Some(" "))).is_none());
    }

    #[test]
    fn test_locked_sentinel_uses_name_key() {
        let key = identity_key(&contact(
            Some("Sam Ray"),
            Some("Acme"),
            Some("email_not_unlocked@domain.com"),
        ))
        .unwrap();
        assert_eq!(key.confidence, KeyConfidence::NameBased);
    }
}
