use crate::identity::identity_key;
use shared_types::{CanonicalContact, DedupeKey};
use std::collections::HashMap;

/// Result of offering one contact to a `ContactSet`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    Inserted(DedupeKey),
    /// Key already present; the earlier contact was kept
    Duplicate(DedupeKey),
    /// No email, name or company to derive a key from
    Unidentifiable,
}

impl MergeOutcome {
    pub fn inserted(&self) -> bool {
        matches!(self, MergeOutcome::Inserted(_))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub inserted: usize,
    pub duplicates: usize,
    /// Duplicates decided by the weak name + company key
    pub name_based_duplicates: usize,
    pub unidentifiable: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactEntry {
    pub key: DedupeKey,
    pub contact: CanonicalContact,
}

/// Session-scoped, insertion-ordered set of contacts keyed by identity.
///
/// A key, once present, is never overwritten: the first occurrence wins.
#[derive(Debug, Default)]
pub struct ContactSet {
    entries: Vec<ContactEntry>,
    index: HashMap<DedupeKey, usize>,
    stats: MergeStats,
}

impl ContactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&mut self, contact: CanonicalContact) -> MergeOutcome {
        let Some(key) = identity_key(&contact) else {
            self.stats.unidentifiable += 1;
            tracing::debug!(
                "Dropping unidentifiable record from query {}",
                contact.source_query
            );
            return MergeOutcome::Unidentifiable;
        };

        if self.index.contains_key(&key) {
            self.stats.duplicates += 1;
            if !key.is_email_based() {
                self.stats.name_based_duplicates += 1;
                tracing::info!("Low-confidence duplicate dropped for {}", key);
            } else {
                tracing::debug!("Duplicate dropped for {}", key);
            }
            return MergeOutcome::Duplicate(key);
        }

        self.index.insert(key.clone(), self.entries.len());
        self.entries.push(ContactEntry {
            key: key.clone(),
            contact,
        });
        self.stats.inserted += 1;

        MergeOutcome::Inserted(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &DedupeKey) -> Option<&CanonicalContact> {
        self.index.get(key).map(|&i| &self.entries[i].contact)
    }

    /// Contacts in arrival order
    pub fn iter(&self) -> impl Iterator<Item = &CanonicalContact> + '_ {
        self.entries.iter().map(|entry| &entry.contact)
    }

    pub fn entries(&self) -> &[ContactEntry] {
        &self.entries
    }

    pub fn stats(&self) -> MergeStats {
        self.stats
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.stats = MergeStats::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn with_email(email: &str, title: &str) -> CanonicalContact {
        CanonicalContact {
            email: Some(email.to_string()),
            title: Some(title.to_string()),
            ..CanonicalContact::new("x.com")
        }
    }

    fn with_name(name: &str, company: &str) -> CanonicalContact {
        CanonicalContact {
            full_name: Some(name.to_string()),
            company: Some(company.to_string()),
            ..CanonicalContact::new(company)
        }
    }

    #[test]
    fn test_first_occurrence_wins() {
        let mut set = ContactSet::new();
        assert!(set.accept(with_email("a@x.com", "HR Director")).inserted());
        let outcome = set.accept(with_email("A@x.com ", "Head of HR"));

        assert!(!outcome.inserted());
        assert!(matches!(outcome, MergeOutcome::Duplicate(_)));
        assert_eq!(set.len(), 1);

        let kept = set.get(&DedupeKey::email("a@x.com")).unwrap();
        assert_eq!(kept.title.as_deref(), Some("HR Director"));
    }

    #[test]
    fn test_order_preserved_and_duplicate_dropped() {
        let mut set = ContactSet::new();
        set.accept(with_email("k1@x.com", "1"));
        set.accept(with_email("k2@x.com", "2"));
        set.accept(with_email("k3@x.com", "3"));
        set.accept(with_email("k2@x.com", "dup"));

        let emails: Vec<&str> = set.iter().filter_map(|c| c.email.as_deref()).collect();
        assert_eq!(emails, vec!["k1@x.com", "k2@x.com", "k3@x.com"]);
    }

    #[test]
    fn test_no_duplicate_emails() {
        let mut set = ContactSet::new();
        for email in ["a@x.com", "b@x.com", "A@X.COM", " b@x.com", "c@x.com"] {
            set.accept(with_email(email, "t"));
        }

        let normalized: Vec<String> = set
            .iter()
            .filter_map(|c| c.email.as_deref())
            .map(|e| e.trim().to_lowercase())
            .collect();
        let distinct: HashSet<&String> = normalized.iter().collect();
        assert_eq!(normalized.len(), distinct.len());
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_unidentifiable_is_rejected() {
        let mut set = ContactSet::new();
        let outcome = set.accept(CanonicalContact::new("acme.com"));

        assert_eq!(outcome, MergeOutcome::Unidentifiable);
        assert!(set.is_empty());
        assert_eq!(set.stats().unidentifiable, 1);
    }

    #[test]
    fn test_locked_contacts_do_not_collide() {
        let mut set = ContactSet::new();
        assert!(set.accept(with_name("Sam Ray", "Acme")).inserted());
        assert!(set.accept(with_name("Jo Lee", "Acme")).inserted());
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_name_based_duplicates_are_counted() {
        let mut set = ContactSet::new();
        set.accept(with_name("Sam Ray", "Acme"));
        set.accept(with_name("sam ray", "ACME"));
        set.accept(with_email("sam@acme.com", "CTO"));

        let stats = set.stats();
        assert_eq!(stats.inserted, 2);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.name_based_duplicates, 1);
    }

    #[test]
    fn test_interleaved_queries_share_one_order() {
        let mut set = ContactSet::new();
        let mut from_a = with_email("a1@a.com", "t");
        from_a.source_query = "A".to_string();
        let mut from_b = with_email("b1@b.com", "t");
        from_b.source_query = "B".to_string();
        let mut from_b_dup = with_email("a1@a.com", "t");
        from_b_dup.source_query = "B".to_string();

        set.accept(from_a);
        set.accept(from_b);
        set.accept(from_b_dup);

        let sources: Vec<&str> = set.iter().map(|c| c.source_query.as_str()).collect();
        assert_eq!(sources, vec!["A", "B"]);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut set = ContactSet::new();
        set.accept(with_email("a@x.com", "t"));
        set.clear();

        assert!(set.is_empty());
        assert_eq!(set.stats(), MergeStats::default());
        assert!(set.accept(with_email("a@x.com", "t")).inserted());
    }
}
