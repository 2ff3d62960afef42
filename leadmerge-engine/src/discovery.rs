use async_trait::async_trait;
use shared_types::{CompanyFilters, PresenceCheck, SearchQuery};
use std::collections::HashSet;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiscoveryError {
    #[error("Company search rate limited")]
    RateLimited,

    #[error("Company search failed: {0}")]
    UpstreamFailure(String),

    #[error("Company search returned an unreadable response: {0}")]
    InvalidResponse(String),
}

/// Upstream company-search collaborator that produces the companies to search people at
#[async_trait]
pub trait CompanySource: Send + Sync {
    async fn search_companies(
        &self,
        filters: &CompanyFilters,
    ) -> Result<Vec<SearchQuery>, DiscoveryError>;

    /// Current employees of `company` based in `location`
    async fn local_headcount(&self, company: &str, location: &str) -> Result<u64, DiscoveryError>;

    /// Whether `company` currently employs someone in `location` holding one of `roles`
    async fn has_relevant_profile(
        &self,
        company: &str,
        location: &str,
        roles: &[String],
    ) -> Result<bool, DiscoveryError>;
}

/// Find companies matching `filters`, optionally keeping only those with a
/// local presence.
///
/// Names are de-duplicated case-insensitively. A failed presence lookup drops
/// the company and is logged. Cancellation stops the presence checks and
/// returns the companies confirmed so far.
pub async fn discover_companies(
    source: &dyn CompanySource,
    filters: &CompanyFilters,
    presence: Option<&PresenceCheck>,
    cancel: &CancellationToken,
) -> Result<Vec<SearchQuery>, DiscoveryError> {
    let found = source.search_companies(filters).await?;

    let mut seen = HashSet::new();
    let candidates: Vec<SearchQuery> = found
        .into_iter()
        .filter(|q| !q.term.trim().is_empty() && seen.insert(q.term.trim().to_lowercase()))
        .collect();

    tracing::info!("Company search returned {} companies", candidates.len());

    let Some(check) = presence else {
        return Ok(candidates);
    };

    let mut confirmed = Vec::new();
    for query in candidates {
        if cancel.is_cancelled() {
            tracing::info!("Company discovery cancelled");
            break;
        }

        match has_presence(source, &query.term, check).await {
            Ok(true) => confirmed.push(query),
            Ok(false) => tracing::info!(
                "No relevant profile found for {} in {}",
                query.term,
                check.location
            ),
            Err(e) => tracing::error!("Presence check for {} failed: {}", query.term, e),
        }
    }

    Ok(confirmed)
}

async fn has_presence(
    source: &dyn CompanySource,
    company: &str,
    check: &PresenceCheck,
) -> Result<bool, DiscoveryError> {
    if let Some(minimum) = check.min_local_employees {
        let headcount = source.local_headcount(company, &check.location).await?;
        if headcount < minimum {
            tracing::debug!(
                "{} has {} employees in {}, below {}",
                company,
                headcount,
                check.location,
                minimum
            );
            return Ok(false);
        }
    }

    source
        .has_relevant_profile(company, &check.location, &check.roles)
        .await
}
