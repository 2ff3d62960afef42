use super::{invalid_response, status_error, transport_error};
use async_trait::async_trait;
use leadmerge_engine::ContactSource;
use serde_json::Value;
use shared_types::{Provider, ProviderError, RawContactRecord, SearchFilters, SearchQuery};

const APOLLO_PEOPLE_SEARCH_URL: &str = "https://api.apollo.io/api/v1/mixed_people/search";

pub struct ApolloClient {
    http: reqwest::Client,
    api_key: String,
    search_url: String,
}

impl ApolloClient {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            search_url: APOLLO_PEOPLE_SEARCH_URL.to_string(),
        }
    }

    pub fn query_params(query: &SearchQuery, filters: &SearchFilters) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        for title in &filters.job_titles {
            params.push(("person_titles[]", title.clone()));
        }
        for location in &filters.locations {
            params.push(("person_locations[]", location.clone()));
        }
        for seniority in &filters.seniorities {
            params.push(("person_seniorities[]", seniority.clone()));
        }
        if let Some(domain) = &query.domain {
            params.push(("q_organization_domains_list[]", domain.clone()));
        }
        params.push(("q_organization_names[]", query.term.clone()));
        params.push(("include_similar_titles", "true".to_string()));
        params.push(("per_page", filters.per_page.to_string()));
        params.push(("page", filters.page.to_string()));
        params
    }
}

/// Records from the `people` array of a search response
pub fn parse_people(body: Value) -> Vec<RawContactRecord> {
    match body {
        Value::Object(mut map) => match map.remove("people") {
            Some(Value::Array(people)) => people
                .into_iter()
                .filter(Value::is_object)
                .map(|person| RawContactRecord::from_value(Provider::Apollo, person))
                .collect(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

#[async_trait]
impl ContactSource for ApolloClient {
    fn provider(&self) -> Provider {
        Provider::Apollo
    }

    async fn search(
        &self,
        query: &SearchQuery,
        filters: &SearchFilters,
    ) -> Result<Vec<RawContactRecord>, ProviderError> {
        let response = self
            .http
            .post(&self.search_url)
            .query(&Self::query_params(query, filters))
            .header("accept", "application/json")
            .header("Cache-Control", "no-cache")
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| transport_error(Provider::Apollo, query, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(Provider::Apollo, query, status, &body));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| invalid_response(Provider::Apollo, query, e))?;

        let people = parse_people(body);
        tracing::debug!("Apollo returned {} people for {}", people.len(), query.term);
        Ok(people)
    }
}
