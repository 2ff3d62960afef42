pub mod contact_set;
pub mod discovery;
pub mod export;
pub mod filters;
pub mod hubspot;
pub mod identity;
pub mod projector;
pub mod session;

pub use contact_set::{ContactEntry, ContactSet, MergeOutcome, MergeStats};
pub use discovery::{discover_companies, CompanySource, DiscoveryError};
pub use export::{export_csv, write_csv, ExportError};
pub use filters::RoleFilter;
pub use hubspot::HubspotContactProperties;
pub use identity::identity_key;
pub use projector::{page, project, to_row, total_pages, Rows};
pub use session::{ContactSource, QueryReport, SearchSession, SessionOptions, SessionReport};
