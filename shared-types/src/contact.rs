use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider-agnostic person record produced by the normalizers.
///
/// `email`, when present, is never the provider's locked-email sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalContact {
    pub full_name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub linkedin_url: Option<String>,
    /// Company or domain term whose query produced this record
    pub source_query: String,
}

impl CanonicalContact {
    pub fn new(source_query: impl Into<String>) -> Self {
        Self {
            source_query: source_query.into(),
            ..Default::default()
        }
    }

    pub fn has_identity(&self) -> bool {
        self.email.is_some() || self.full_name.is_some() || self.company.is_some()
    }
}

/// How much a dedup key can be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyConfidence {
    /// Derived from a normalized email address
    EmailBased,
    /// Derived from name + company; may over- or under-merge
    NameBased,
}

/// Uniqueness criterion for a contact within a session.
///
/// Email-based and name-based keys live in separate namespaces, so a name key
/// can never collide with an email key even if the strings match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DedupeKey {
    pub value: String,
    pub confidence: KeyConfidence,
}

impl DedupeKey {
    pub fn email(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            confidence: KeyConfidence::EmailBased,
        }
    }

    pub fn name(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            confidence: KeyConfidence::NameBased,
        }
    }

    pub fn is_email_based(&self) -> bool {
        self.confidence == KeyConfidence::EmailBased
    }
}

impl fmt::Display for DedupeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.confidence {
            KeyConfidence::EmailBased => write!(f, "email:{}", self.value),
            KeyConfidence::NameBased => write!(f, "name:{}", self.value.replace('\u{1f}', "|")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_confidence_serialization() {
        let json = serde_json::to_string(&KeyConfidence::EmailBased).unwrap();
        assert_eq!(json, "\"email-based\"");

        let json = serde_json::to_string(&KeyConfidence::NameBased).unwrap();
        assert_eq!(json, "\"name-based\"");
    }

    #[test]
    fn test_key_namespaces_are_distinct() {
        let by_email = DedupeKey::email("jo lee");
        let by_name = DedupeKey::name("jo lee");
        assert_ne!(by_email, by_name);
        assert!(by_email.is_email_based());
        assert!(!by_name.is_email_based());
    }

    #[test]
    fn test_contact_identity() {
        let empty = CanonicalContact::new("acme.com");
        assert!(!empty.has_identity());
        assert_eq!(empty.source_query, "acme.com");

        let named = CanonicalContact {
            company: Some("Acme".to_string()),
            ..CanonicalContact::new("Acme")
        };
        assert!(named.has_identity());
    }

    #[test]
    fn test_display_key() {
        assert_eq!(DedupeKey::email("a@x.com").to_string(), "email:a@x.com");
        assert_eq!(
            DedupeKey::name("sam ray\u{1f}acme").to_string(),
            "name:sam ray|acme"
        );
    }
}
