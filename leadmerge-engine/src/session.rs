use crate::contact_set::{ContactSet, MergeOutcome};
use crate::filters::RoleFilter;
use crate::projector::{project, Rows};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared_types::{
    Provider, ProviderError, QuerySummary, RawContactRecord, SearchFilters, SearchQuery,
};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Upstream people-search collaborator: one page of records per call
#[async_trait]
pub trait ContactSource: Send + Sync {
    fn provider(&self) -> Provider;

    async fn search(
        &self,
        query: &SearchQuery,
        filters: &SearchFilters,
    ) -> Result<Vec<RawContactRecord>, ProviderError>;
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Pause between consecutive provider calls
    pub delay: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(200),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryReport {
    pub query: SearchQuery,
    pub outcome: Result<QuerySummary, ProviderError>,
}

#[derive(Debug, Clone, Default)]
pub struct SessionReport {
    pub queries: Vec<QueryReport>,
    /// Contacts dropped by the role filter before merging
    pub filtered_out: usize,
    pub rate_limited: bool,
    pub cancelled: bool,
}

impl SessionReport {
    pub fn failures(&self) -> impl Iterator<Item = &ProviderError> + '_ {
        self.queries.iter().filter_map(|q| q.outcome.as_ref().err())
    }

    pub fn succeeded(&self) -> usize {
        self.queries.iter().filter(|q| q.outcome.is_ok()).count()
    }
}

/// State of one search submission. Start a new session for every new search.
pub struct SearchSession {
    id: Uuid,
    started_at: DateTime<Utc>,
    filters: SearchFilters,
    role_filter: RoleFilter,
    contacts: ContactSet,
    report: SessionReport,
}

impl SearchSession {
    pub fn new(filters: SearchFilters) -> Self {
        let role_filter = RoleFilter::new(&filters.role_keywords);
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            filters,
            role_filter,
            contacts: ContactSet::new(),
            report: SessionReport::default(),
        }
    }

    pub fn contacts(&self) -> &ContactSet {
        &self.contacts
    }

    pub fn report(&self) -> &SessionReport {
        &self.report
    }

    pub fn rows(&self) -> Rows<'_> {
        project(&self.contacts)
    }

    /// Run the queries in order against `source`, merging as results arrive.
    ///
    /// A failing query is recorded and the next one is tried. Cancellation is
    /// checked before every call; contacts merged so far stay in the session.
    pub async fn run(
        &mut self,
        source: &dyn ContactSource,
        queries: &[SearchQuery],
        options: &SessionOptions,
        cancel: &CancellationToken,
    ) -> &SessionReport {
        tracing::info!(
            session_id = %self.id,
            provider = %source.provider(),
            queries = queries.len(),
            "Starting search session"
        );

        for (idx, query) in queries.iter().enumerate() {
            if idx > 0 && !options.delay.is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => {}
                    _ = tokio::time::sleep(options.delay) => {}
                }
            }

            if cancel.is_cancelled() {
                tracing::info!(
                    session_id = %self.id,
                    completed = idx,
                    "Search cancelled"
                );
                self.report.cancelled = true;
                break;
            }

            tracing::info!("Searching {} ({}/{})", query.term, idx + 1, queries.len());

            let result = source.search(query, &self.filters).await;
            let outcome = match result {
                Ok(records) => Ok(self.ingest(&query.term, records)),
                Err(e) => {
                    if e.is_rate_limited() {
                        self.report.rate_limited = true;
                        tracing::warn!("{}", e);
                    } else {
                        tracing::error!("{}", e);
                    }
                    Err(e)
                }
            };

            self.report.queries.push(QueryReport {
                query: query.clone(),
                outcome,
            });
        }

        let stats = self.contacts.stats();
        tracing::info!(
            session_id = %self.id,
            contacts = self.contacts.len(),
            duplicates = stats.duplicates,
            name_based_duplicates = stats.name_based_duplicates,
            unidentifiable = stats.unidentifiable,
            filtered_out = self.report.filtered_out,
            elapsed_ms = (Utc::now() - self.started_at).num_milliseconds(),
            "Search session finished"
        );

        &self.report
    }

    /// Normalize, filter and merge one page of records produced by `source_query`.
    pub fn ingest(&mut self, source_query: &str, records: Vec<RawContactRecord>) -> QuerySummary {
        let received = records.len();
        let mut inserted = 0;

        for raw in &records {
            let contact = normalizers::normalize(raw, source_query);

            if !self.role_filter.matches(&contact) {
                self.report.filtered_out += 1;
                continue;
            }

            if let MergeOutcome::Inserted(_) = self.contacts.accept(contact) {
                inserted += 1;
            }
        }

        tracing::debug!(
            "{}: {} records received, {} new contacts",
            source_query,
            received,
            inserted
        );

        QuerySummary {
            term: source_query.to_string(),
            received,
            inserted,
        }
    }
}
