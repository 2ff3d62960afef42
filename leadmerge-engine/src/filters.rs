use shared_types::CanonicalContact;

/// Keeps contacts whose title mentions one of the target role keywords
#[derive(Debug, Clone, Default)]
pub struct RoleFilter {
    keywords: Vec<String>,
}

impl RoleFilter {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// An empty filter keeps everyone; otherwise a contact without a title is dropped.
    pub fn matches(&self, contact: &CanonicalContact) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        let Some(title) = contact.title.as_deref() else {
            return false;
        };
        let title = title.to_lowercase();
        self.keywords.iter().any(|keyword| title.contains(keyword.as_str()))
    }
}
