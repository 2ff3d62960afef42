use super::truncate;
use async_trait::async_trait;
use leadmerge_engine::{CompanySource, DiscoveryError};
use reqwest::StatusCode;
use serde_json::{json, Map, Value};
use shared_types::{CompanyFilters, SearchQuery};

const CORESIGNAL_COMPANY_SEARCH_URL: &str =
    "https://api.coresignal.com/api/v2/company/base/search/filter";
const CORESIGNAL_COMPANY_COLLECT_URL: &str =
    "https://api.coresignal.com/cdapi/v2/company/base/collect/";
const CORESIGNAL_EMPLOYEE_SEARCH_URL: &str = "https://api.coresignal.com/v1/employee/search";

pub struct CoresignalClient {
    http: reqwest::Client,
    api_key: String,
}

impl CoresignalClient {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
        }
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, DiscoveryError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(discovery_status_error(status, &body));
        }

        response
            .json()
            .await
            .map_err(|e| DiscoveryError::InvalidResponse(e.to_string()))
    }

    /// Full company record for an id returned by the filter search
    async fn collect_company(&self, company_id: &str) -> Result<Value, DiscoveryError> {
        let response = self
            .http
            .get(format!("{}{}", CORESIGNAL_COMPANY_COLLECT_URL, company_id))
            .header("accept", "application/json")
            .header("apikey", &self.api_key)
            .send()
            .await
            .map_err(|e| DiscoveryError::UpstreamFailure(e.to_string()))?;

        Self::read_json(response).await
    }

    async fn employee_hits(&self, query: &Value) -> Result<u64, DiscoveryError> {
        let response = self
            .http
            .post(CORESIGNAL_EMPLOYEE_SEARCH_URL)
            .bearer_auth(&self.api_key)
            .json(query)
            .send()
            .await
            .map_err(|e| DiscoveryError::UpstreamFailure(e.to_string()))?;

        Ok(total_hits(&Self::read_json(response).await?))
    }
}

fn discovery_status_error(status: StatusCode, body: &str) -> DiscoveryError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return DiscoveryError::RateLimited;
    }
    let detail = body.trim();
    if detail.is_empty() {
        DiscoveryError::UpstreamFailure(format!("HTTP {}", status.as_u16()))
    } else {
        DiscoveryError::UpstreamFailure(format!(
            "HTTP {}: {}",
            status.as_u16(),
            truncate(detail, 200)
        ))
    }
}

/// Request body for the company filter search. Unset filters are left out.
pub fn filter_payload(filters: &CompanyFilters) -> Value {
    let mut payload = Map::new();
    let mut put = |field: &str, value: Option<Value>| {
        if let Some(value) = value {
            payload.insert(field.to_string(), value);
        }
    };
    let text = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| Value::String(v.to_string()))
    };

    put("size", text(&filters.size));
    put("industry", text(&filters.industry));
    put("country", text(&filters.country));
    put("location", text(&filters.location));
    put("employees count gte", filters.employees_count_gte.map(Value::from));
    put(
        "funding total rounds count gte",
        filters.funding_total_rounds_count_gte.map(Value::from),
    );
    put(
        "funding last round date gte",
        text(&filters.funding_last_round_date_gte),
    );
    put("funding last round type", text(&filters.funding_last_round_type));
    put("last updated gte", text(&filters.last_updated_gte));
    put("limit", Some(Value::from(filters.limit)));

    Value::Object(payload)
}

/// Search results arrive either as a bare array or under `results`
fn result_items(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Turn a company record into a people-search query, keeping its website's domain
pub fn company_query(company: &Value) -> Option<SearchQuery> {
    let name = ["company_name", "name"]
        .iter()
        .find_map(|key| company.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|name| !name.is_empty())?;

    let domain = company
        .get("website")
        .and_then(Value::as_str)
        .and_then(domain_from_website);

    Some(match domain {
        Some(domain) => SearchQuery::with_domain(name, domain),
        None => SearchQuery::company(name),
    })
}

/// `https://www.zopa.com/about` -> `zopa.com`
pub fn domain_from_website(website: &str) -> Option<String> {
    let website = website.trim();
    let without_scheme = website
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(website);
    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .trim_start_matches("www.")
        .to_lowercase();

    (host.contains('.')).then_some(host)
}

/// Current employees of `company` in `location`, optionally holding one of `roles`
pub fn employee_query(company: &str, location: &str, roles: Option<&[String]>, size: u32) -> Value {
    let mut must = vec![
        json!({"match_phrase": {"experience.company.name": company}}),
        json!({"match_phrase": {"location.name": location}}),
        json!({"term": {"experience.current": true}}),
    ];
    if let Some(roles) = roles.filter(|roles| !roles.is_empty()) {
        let should: Vec<Value> = roles
            .iter()
            .map(|role| json!({"match": {"experience.title": role}}))
            .collect();
        must.push(json!({"bool": {"should": should}}));
    }

    json!({
        "query": {"bool": {"must": must}},
        "size": size,
        "track_total_hits": true
    })
}

fn total_hits(body: &Value) -> u64 {
    body.pointer("/hits/total/value")
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

#[async_trait]
impl CompanySource for CoresignalClient {
    async fn search_companies(
        &self,
        filters: &CompanyFilters,
    ) -> Result<Vec<SearchQuery>, DiscoveryError> {
        let response = self
            .http
            .post(CORESIGNAL_COMPANY_SEARCH_URL)
            .header("accept", "application/json")
            .header("apikey", &self.api_key)
            .json(&filter_payload(filters))
            .send()
            .await
            .map_err(|e| DiscoveryError::UpstreamFailure(e.to_string()))?;

        let items = result_items(Self::read_json(response).await?);
        let mut queries = Vec::new();

        for item in items {
            let company = if let Some(id) = item.as_u64() {
                match self.collect_company(&id.to_string()).await {
                    Ok(company) => company,
                    Err(DiscoveryError::RateLimited) => return Err(DiscoveryError::RateLimited),
                    Err(e) => {
                        tracing::warn!("Failed to collect company {}: {}", id, e);
                        continue;
                    }
                }
            } else if item.is_object() {
                item
            } else {
                continue;
            };

            if let Some(query) = company_query(&company) {
                queries.push(query);
            }
        }

        Ok(queries)
    }

    async fn local_headcount(&self, company: &str, location: &str) -> Result<u64, DiscoveryError> {
        self.employee_hits(&employee_query(company, location, None, 0))
            .await
    }

    async fn has_relevant_profile(
        &self,
        company: &str,
        location: &str,
        roles: &[String],
    ) -> Result<bool, DiscoveryError> {
        let hits = self
            .employee_hits(&employee_query(company, location, Some(roles), 1))
            .await?;
        Ok(hits > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_payload_uses_api_field_names() {
        let filters = CompanyFilters {
            industry: Some("Financial Services".to_string()),
            country: Some("  ".to_string()),
            employees_count_gte: Some(50),
            funding_last_round_type: Some("series_b".to_string()),
            limit: 5,
            ..CompanyFilters::default()
        };

        assert_eq!(
            filter_payload(&filters),
            json!({
                "industry": "Financial Services",
                "employees count gte": 50,
                "funding last round type": "series_b",
                "limit": 5
            })
        );
    }

    #[test]
    fn test_company_query_from_record() {
        let query = company_query(&json!({
            "id": 123,
            "company_name": "Zopa",
            "website": "https://www.zopa.com/about"
        }));
        assert_eq!(query, Some(SearchQuery::with_domain("Zopa", "zopa.com")));

        let query = company_query(&json!({"name": "Teya", "website": "n/a"}));
        assert_eq!(query, Some(SearchQuery::company("Teya")));

        assert!(company_query(&json!({"name": "  "})).is_none());
    }

    #[test]
    fn test_domain_from_website() {
        assert_eq!(domain_from_website("allica.bank").as_deref(), Some("allica.bank"));
        assert_eq!(
            domain_from_website("http://WWW.OakNorth.com?ref=x").as_deref(),
            Some("oaknorth.com")
        );
        assert!(domain_from_website("").is_none());
    }

    #[test]
    fn test_result_items_shapes() {
        assert_eq!(result_items(json!([1, 2])).len(), 2);
        assert_eq!(result_items(json!({"results": [{"name": "Zopa"}]})).len(), 1);
        assert!(result_items(json!({"message": "error"})).is_empty());
    }

    #[test]
    fn test_employee_query_with_roles() {
        let roles = vec!["HR".to_string(), "Talent".to_string()];
        let query = employee_query("Zopa", "London", Some(&roles), 1);

        let must = query.pointer("/query/bool/must").unwrap().as_array().unwrap();
        assert_eq!(must.len(), 4);
        assert_eq!(
            must[3],
            json!({"bool": {"should": [
                {"match": {"experience.title": "HR"}},
                {"match": {"experience.title": "Talent"}}
            ]}})
        );
        assert_eq!(query["size"], json!(1));

        let query = employee_query("Zopa", "London", None, 0);
        assert_eq!(query.pointer("/query/bool/must").unwrap().as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_total_hits_and_status() {
        assert_eq!(total_hits(&json!({"hits": {"total": {"value": 42}}})), 42);
        assert_eq!(total_hits(&json!({})), 0);

        assert_eq!(
            discovery_status_error(StatusCode::TOO_MANY_REQUESTS, ""),
            DiscoveryError::RateLimited
        );
        assert_eq!(
            discovery_status_error(StatusCode::FORBIDDEN, "no credits"),
            DiscoveryError::UpstreamFailure("HTTP 403: no credits".to_string())
        );
    }
}
