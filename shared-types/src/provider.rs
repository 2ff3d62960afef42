use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::CanonicalContact;

/// Placeholder some providers return in place of an address that needs a paid reveal
pub const LOCKED_EMAIL_SENTINEL: &str = "email_not_unlocked@domain.com";

/// Core trait that every provider adapter must implement
pub trait ContactAdapter {
    /// Provider whose record shape this adapter understands
    fn provider(&self) -> Provider;

    /// Map one raw record to the canonical shape. Missing fields become `None`.
    fn normalize(&self, fields: &Map<String, Value>, source_query: &str) -> CanonicalContact;
}

/// External people-search services we read records from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
    Apollo,
    Hunter,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Apollo => write!(f, "apollo"),
            Provider::Hunter => write!(f, "hunter"),
        }
    }
}

/// One person record exactly as a provider returned it, tagged with its origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawContactRecord {
    pub provider: Provider,
    pub fields: Map<String, Value>,
}

impl RawContactRecord {
    pub fn new(provider: Provider, fields: Map<String, Value>) -> Self {
        Self { provider, fields }
    }

    /// Wrap a JSON value; anything other than an object becomes an empty record.
    pub fn from_value(provider: Provider, value: Value) -> Self {
        let fields = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self { provider, fields }
    }
}

/// Failures of a single upstream query. None of these abort a session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("{provider} rate limited while querying {query}")]
    RateLimited { provider: Provider, query: String },

    #[error("{provider} query for {query} failed: {reason}")]
    UpstreamQueryFailure {
        provider: Provider,
        query: String,
        reason: String,
    },

    #[error("{provider} returned an unreadable response for {query}: {reason}")]
    InvalidResponse {
        provider: Provider,
        query: String,
        reason: String,
    },
}

impl ProviderError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ProviderError::RateLimited { .. })
    }

    pub fn query(&self) -> &str {
        match self {
            ProviderError::RateLimited { query, .. }
            | ProviderError::UpstreamQueryFailure { query, .. }
            | ProviderError::InvalidResponse { query, .. } => query,
        }
    }
}

/// Errors reading caller-supplied input files
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
