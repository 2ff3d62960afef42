use crate::email::sanitize_email;
use crate::fields::{first_text, join_present, nested_text, objects, text};
use serde_json::{Map, Value};
use shared_types::{CanonicalContact, ContactAdapter, Provider};

const VERIFIED_STATUS: &str = "verified";

/// Adapter for people returned by Apollo's mixed people search.
///
/// Apollo puts a revealed address in `email` and any further known addresses
/// in `contact_emails`, each carrying an `email_status`.
pub struct ApolloAdapter;

impl ApolloAdapter {
    fn full_name(fields: &Map<String, Value>) -> Option<String> {
        text(fields, "name").or_else(|| {
            join_present(
                &[text(fields, "first_name"), text(fields, "last_name")],
                " ",
            )
        })
    }

    fn email(fields: &Map<String, Value>) -> Option<String> {
        text(fields, "email")
            .and_then(|email| sanitize_email(&email))
            .or_else(|| {
                objects(fields, "contact_emails")
                    .filter(|entry| {
                        text(entry, "email_status")
                            .map(|status| status.eq_ignore_ascii_case(VERIFIED_STATUS))
                            .unwrap_or(false)
                    })
                    .find_map(|entry| text(entry, "email").and_then(|email| sanitize_email(&email)))
            })
    }

    fn company(fields: &Map<String, Value>) -> Option<String> {
        text(fields, "organization_name")
            .or_else(|| nested_text(fields, &["organization", "name"]))
            .or_else(|| text(fields, "company"))
    }

    fn location(fields: &Map<String, Value>) -> Option<String> {
        text(fields, "present_raw_address").or_else(|| {
            join_present(&[text(fields, "city"), text(fields, "country")], ", ")
        })
    }
}

impl ContactAdapter for ApolloAdapter {
    fn provider(&self) -> Provider {
        Provider::Apollo
    }

    fn normalize(&self, fields: &Map<String, Value>, source_query: &str) -> CanonicalContact {
        CanonicalContact {
            full_name: Self::full_name(fields),
            title: first_text(fields, &["title", "headline"]),
            email: Self::email(fields),
            company: Self::company(fields),
            location: Self::location(fields),
            linkedin_url: text(fields, "linkedin_url"),
            source_query: source_query.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn normalize(value: Value) -> CanonicalContact {
        ApolloAdapter.normalize(value.as_object().unwrap(), "Acme")
    }

    #[test]
    fn test_full_person() {
        let contact = normalize(json!({
            "name": "Jo Lee",
            "title": "HR Director",
            "email": "a@x.com",
            "organization_name": "Acme",
            "present_raw_address": "London, England, United Kingdom",
            "city": "London",
            "country": "United Kingdom",
            "linkedin_url": "http://www.linkedin.com/in/jolee"
        }));

        assert_eq!(contact.full_name.as_deref(), Some("Jo Lee"));
        assert_eq!(contact.title.as_deref(), Some("HR Director"));
        assert_eq!(contact.email.as_deref(), Some("a@x.com"));
        assert_eq!(contact.company.as_deref(), Some("Acme"));
        assert_eq!(
            contact.location.as_deref(),
            Some("London, England, United Kingdom")
        );
        assert_eq!(
            contact.linkedin_url.as_deref(),
            Some("http://www.linkedin.com/in/jolee")
        );
        assert_eq!(contact.source_query, "Acme");
    }

    #[test]
    fn test_verified_contact_email_fallback() {
        let contact = normalize(json!({
            "name": "Jo Lee",
            "email": null,
            "contact_emails": [
                {"email": "guess@x.com", "email_status": "guessed"},
                {"email": "jo@x.com", "email_status": "verified"},
                {"email": "other@x.com", "email_status": "verified"}
            ]
        }));

        assert_eq!(contact.email.as_deref(), Some("jo@x.com"));
    }

    #[test]
    fn test_no_verified_contact_email() {
        let contact = normalize(json!({
            "name": "Jo Lee",
            "contact_emails": [{"email": "guess@x.com", "email_status": "guessed"}]
        }));

        assert!(contact.email.is_none());
    }

    #[test]
    fn test_locked_email_is_absent() {
        let contact = normalize(json!({
            "name": "Jo Lee",
            "email": "email_not_unlocked@domain.com",
            "organization_name": "Acme"
        }));

        assert!(contact.email.is_none());
        assert_eq!(contact.full_name.as_deref(), Some("Jo Lee"));
    }

    #[test]
    fn test_locked_email_falls_through_to_verified_entry() {
        let contact = normalize(json!({
            "email": "email_not_unlocked@domain.com",
            "contact_emails": [{"email": "jo@x.com", "email_status": "verified"}]
        }));

        assert_eq!(contact.email.as_deref(), Some("jo@x.com"));
    }

    #[test]
    fn test_location_composite_fallback() {
        let contact = normalize(json!({"city": "Paris", "country": "France"}));
        assert_eq!(contact.location.as_deref(), Some("Paris, France"));

        let contact = normalize(json!({"country": "France"}));
        assert_eq!(contact.location.as_deref(), Some("France"));

        let contact = normalize(json!({"present_raw_address": ""}));
        assert!(contact.location.is_none());
    }

    #[test]
    fn test_name_and_company_fallbacks() {
        let contact = normalize(json!({
            "first_name": "Sam",
            "last_name": "Ray",
            "organization": {"name": "Acme Ltd"}
        }));

        assert_eq!(contact.full_name.as_deref(), Some("Sam Ray"));
        assert_eq!(contact.company.as_deref(), Some("Acme Ltd"));

        let contact = normalize(json!({"email": null, "name": "Sam Ray", "company": "Acme"}));
        assert_eq!(contact.company.as_deref(), Some("Acme"));
        assert!(contact.email.is_none());
    }
}
