use serde::{Deserialize, Serialize};

pub mod contact;
pub mod export;
pub mod provider;
pub mod query;

pub use contact::{CanonicalContact, DedupeKey, KeyConfidence};
pub use export::{ExportRow, PLACEHOLDER};
pub use provider::{
    ContactAdapter, ImportError, Provider, ProviderError, RawContactRecord, LOCKED_EMAIL_SENTINEL,
};
pub use query::{CompanyFilters, PresenceCheck, SearchFilters, SearchQuery};

/// Summary of a single provider query, reported back to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySummary {
    pub term: String,
    pub received: usize,
    pub inserted: usize,
}
