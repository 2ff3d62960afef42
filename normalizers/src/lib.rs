//! Normalizers Crate
//!
//! Turns raw people records from the different search providers into the single
//! `CanonicalContact` shape used by the merge engine.
//!
//! # Architecture
//!
//! - **Types**: `RawContactRecord`, `CanonicalContact` and the `ContactAdapter` trait
//!   live in the `shared-types` crate
//! - **Adapters**: one adapter per provider is implemented here; adding a provider
//!   means adding an adapter, never branching inside an existing one
//!
//! # Available Adapters
//!
//! - `ApolloAdapter`: people returned by Apollo's mixed people search
//! - `HunterAdapter`: email entries returned by Hunter's domain search
//!
//! The `company_list` module also reads the company names a search runs over.
//!
//! # Example
//!
//! ```rust,ignore
//! use normalizers::normalize;
//!
//! let contact = normalize(&raw, "Acme");
//! ```

pub mod apollo;
pub mod company_list;
pub mod email;
pub mod fields;
pub mod hunter;

pub use apollo::ApolloAdapter;
pub use company_list::CompanyListParser;
pub use hunter::HunterAdapter;

use shared_types::{CanonicalContact, Provider, RawContactRecord};

// Re-export the adapter trait from shared-types for convenience
pub use shared_types::ContactAdapter;

/// Normalize a raw record with the adapter for the provider it came from.
///
/// Never fails: anything missing or malformed becomes an absent field.
pub fn normalize(raw: &RawContactRecord, source_query: &str) -> CanonicalContact {
    adapter_for(raw.provider).normalize(&raw.fields, source_query)
}

pub fn adapter_for(provider: Provider) -> &'static dyn ContactAdapter {
    match provider {
        Provider::Apollo => &ApolloAdapter,
        Provider::Hunter => &HunterAdapter,
    }
}
