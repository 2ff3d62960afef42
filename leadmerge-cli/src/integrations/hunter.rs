use super::{invalid_response, status_error, transport_error};
use async_trait::async_trait;
use leadmerge_engine::ContactSource;
use serde_json::{Map, Value};
use shared_types::{Provider, ProviderError, RawContactRecord, SearchFilters, SearchQuery};

const HUNTER_DOMAIN_SEARCH_URL: &str = "https://api.hunter.io/v2/domain-search";

pub struct HunterClient {
    http: reqwest::Client,
    api_key: String,
    search_url: String,
}

impl HunterClient {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
            search_url: HUNTER_DOMAIN_SEARCH_URL.to_string(),
        }
    }

    async fn domain_search(
        &self,
        query: &SearchQuery,
        params: &[(&str, String)],
    ) -> Result<Value, ProviderError> {
        let response = self
            .http
            .get(&self.search_url)
            .query(params)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| transport_error(Provider::Hunter, query, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(Provider::Hunter, query, status, &body));
        }

        response
            .json()
            .await
            .map_err(|e| invalid_response(Provider::Hunter, query, e))
    }

    /// Look up the company's domain when the query does not carry one
    async fn resolve_domain(&self, query: &SearchQuery) -> Result<Option<String>, ProviderError> {
        if let Some(domain) = &query.domain {
            return Ok(Some(domain.clone()));
        }

        let body = self
            .domain_search(query, &[("company", query.term.clone())])
            .await?;

        Ok(body
            .get("data")
            .and_then(|data| data.get("domain"))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string))
    }
}

/// Email entries from a domain search, each tagged with the domain's organization
pub fn parse_domain_search(body: &Value) -> Vec<RawContactRecord> {
    let Some(data) = body.get("data") else {
        return Vec::new();
    };

    let organization = data
        .get("organization")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|o| !o.is_empty());

    data.get("emails")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
        .map(|entry| {
            let mut fields: Map<String, Value> = entry.clone();
            if let Some(organization) = organization {
                fields
                    .entry("organization")
                    .or_insert_with(|| Value::String(organization.to_string()));
            }
            RawContactRecord::new(Provider::Hunter, fields)
        })
        .collect()
}

#[async_trait]
impl ContactSource for HunterClient {
    fn provider(&self) -> Provider {
        Provider::Hunter
    }

    async fn search(
        &self,
        query: &SearchQuery,
        filters: &SearchFilters,
    ) -> Result<Vec<RawContactRecord>, ProviderError> {
        let Some(domain) = self.resolve_domain(query).await? else {
            tracing::info!("No domain found for {}", query.term);
            return Ok(Vec::new());
        };

        let body = self
            .domain_search(
                query,
                &[
                    ("domain", domain.clone()),
                    ("limit", filters.per_page.to_string()),
                ],
            )
            .await?;

        let entries = parse_domain_search(&body);
        tracing::debug!("Hunter returned {} emails for {}", entries.len(), domain);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_domain_search() {
        let body = json!({
            "data": {
                "domain": "zopa.com",
                "organization": "Zopa",
                "emails": [
                    {"value": "alex@zopa.com", "first_name": "Alex", "position": "CEO"},
                    {"value": "kim@zopa.com", "first_name": "Kim", "organization": "Zopa Bank"}
                ]
            },
            "meta": {"results": 2}
        });

        let entries = parse_domain_search(&body);
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.provider == Provider::Hunter));
        assert_eq!(entries[0].fields.get("organization"), Some(&json!("Zopa")));
        assert_eq!(entries[1].fields.get("organization"), Some(&json!("Zopa Bank")));
    }

    #[test]
    fn test_parse_without_organization() {
        let body = json!({"data": {"organization": null, "emails": [{"value": "a@x.com"}]}});
        let entries = parse_domain_search(&body);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].fields.get("organization").is_none());
    }

    #[test]
    fn test_parse_error_body() {
        let body = json!({"errors": [{"id": "wrong_params", "code": 400}]});
        assert!(parse_domain_search(&body).is_empty());
    }
}
