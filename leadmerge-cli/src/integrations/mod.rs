pub mod apollo;
pub mod coresignal;
pub mod hubspot;
pub mod hunter;

pub use apollo::ApolloClient;
pub use coresignal::CoresignalClient;
pub use hubspot::HubspotClient;
pub use hunter::HunterClient;

use reqwest::StatusCode;
use shared_types::{Provider, ProviderError, SearchQuery};
use std::time::Duration;

pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder().timeout(timeout).build()
}

/// Map a non-success status: 429 is rate limiting, anything else a failed query
pub(crate) fn status_error(
    provider: Provider,
    query: &SearchQuery,
    status: StatusCode,
    body: &str,
) -> ProviderError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return ProviderError::RateLimited {
            provider,
            query: query.term.clone(),
        };
    }

    let detail = body.trim();
    let reason = if detail.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("HTTP {}: {}", status.as_u16(), truncate(detail, 200))
    };

    ProviderError::UpstreamQueryFailure {
        provider,
        query: query.term.clone(),
        reason,
    }
}

pub(crate) fn transport_error(
    provider: Provider,
    query: &SearchQuery,
    error: reqwest::Error,
) -> ProviderError {
    ProviderError::UpstreamQueryFailure {
        provider,
        query: query.term.clone(),
        reason: error.to_string(),
    }
}

pub(crate) fn invalid_response(
    provider: Provider,
    query: &SearchQuery,
    reason: impl ToString,
) -> ProviderError {
    ProviderError::InvalidResponse {
        provider,
        query: query.term.clone(),
        reason: reason.to_string(),
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
