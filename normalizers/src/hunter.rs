use crate::email::sanitize_email;
use crate::fields::{first_text, join_present, text};
use serde_json::{Map, Value};
use shared_types::{CanonicalContact, ContactAdapter, Provider};

/// Adapter for email entries returned by Hunter's domain search.
///
/// Entries carry no company of their own; the client copies the domain-level
/// `organization` into each entry. The source query stands in otherwise, but
/// only for entries that already name a person or carry an email.
pub struct HunterAdapter;

impl ContactAdapter for HunterAdapter {
    fn provider(&self) -> Provider {
        Provider::Hunter
    }

    fn normalize(&self, fields: &Map<String, Value>, source_query: &str) -> CanonicalContact {
        let full_name = join_present(
            &[text(fields, "first_name"), text(fields, "last_name")],
            " ",
        );
        let email = first_text(fields, &["value", "email"]).and_then(|email| sanitize_email(&email));

        let source = source_query.trim();
        let company = text(fields, "organization").or_else(|| {
            let identified = full_name.is_some() || email.is_some();
            (identified && !source.is_empty()).then(|| source.to_string())
        });

        CanonicalContact {
            full_name,
            title: text(fields, "position"),
            email,
            company,
            location: join_present(&[text(fields, "city"), text(fields, "country")], ", "),
            linkedin_url: text(fields, "linkedin"),
            source_query: source_query.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(value: Value, source_query: &str) -> CanonicalContact {
        HunterAdapter.normalize(value.as_object().unwrap(), source_query)
    }

    #[test]
    fn test_domain_search_entry() {
        let contact = normalize(
            json!({
                "value": "alex@zopa.com",
                "type": "personal",
                "confidence": 94,
                "first_name": "Alex",
                "last_name": "Morgan",
                "position": "Head of People",
                "linkedin": "https://www.linkedin.com/in/alexmorgan",
                "organization": "Zopa"
            }),
            "zopa.com",
        );

        assert_eq!(contact.full_name.as_deref(), Some("Alex Morgan"));
        assert_eq!(contact.title.as_deref(), Some("Head of People"));
        assert_eq!(contact.email.as_deref(), Some("alex@zopa.com"));
        assert_eq!(contact.company.as_deref(), Some("Zopa"));
        assert_eq!(
            contact.linkedin_url.as_deref(),
            Some("https://www.linkedin.com/in/alexmorgan")
        );
        assert!(contact.location.is_none());
        assert_eq!(contact.source_query, "zopa.com");
    }

    #[test]
    fn test_company_falls_back_to_source_query() {
        let contact = normalize(json!({"first_name": "Alex", "position": null}), "Teya");
        assert_eq!(contact.company.as_deref(), Some("Teya"));
        assert_eq!(contact.full_name.as_deref(), Some("Alex"));
        assert!(contact.title.is_none());
    }

    #[test]
    fn test_blank_source_query_leaves_company_absent() {
        let contact = normalize(json!({}), "  ");
        assert!(contact.company.is_none());
        assert!(!contact.has_identity());
    }

    #[test]
    fn test_anonymous_entry_gets_no_company() {
        let contact = normalize(json!({"position": "CEO", "value": null}), "Acme");
        assert!(contact.company.is_none());
        assert!(!contact.has_identity());

        let contact = normalize(json!({"value": "hr@acme.com"}), "Acme");
        assert_eq!(contact.company.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_malformed_email_is_absent() {
        let contact = normalize(json!({"value": "not-an-email", "first_name": "Alex"}), "Teya");
        assert!(contact.email.is_none());
    }
}
