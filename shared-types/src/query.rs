use serde::{Deserialize, Serialize};

/// One upstream search: a company name, optionally with its known domain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchQuery {
    pub term: String,
    pub domain: Option<String>,
}

impl SearchQuery {
    pub fn company(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            domain: None,
        }
    }

    pub fn with_domain(term: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            domain: Some(domain.into()),
        }
    }
}

/// Filter set active for a whole search session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub job_titles: Vec<String>,
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub seniorities: Vec<String>,
    /// Keywords a contact's title must contain one of; empty keeps everyone
    #[serde(default)]
    pub role_keywords: Vec<String>,
    pub per_page: u32,
    pub page: u32,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            job_titles: Vec::new(),
            locations: Vec::new(),
            seniorities: Vec::new(),
            role_keywords: Vec::new(),
            per_page: 50,
            page: 1,
        }
    }
}

/// Firmographic filters for discovering target companies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyFilters {
    /// Headcount band, e.g. "51-200 employees"
    pub size: Option<String>,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub location: Option<String>,
    pub employees_count_gte: Option<u32>,
    pub funding_total_rounds_count_gte: Option<u32>,
    /// ISO date of the most recent funding round
    pub funding_last_round_date_gte: Option<String>,
    pub funding_last_round_type: Option<String>,
    pub last_updated_gte: Option<String>,
    pub limit: u32,
}

impl Default for CompanyFilters {
    fn default() -> Self {
        Self {
            size: None,
            industry: None,
            country: None,
            location: None,
            employees_count_gte: None,
            funding_total_rounds_count_gte: None,
            funding_last_round_date_gte: None,
            funding_last_round_type: None,
            last_updated_gte: None,
            limit: 20,
        }
    }
}

/// Requirement that a discovered company actually employs people in a place
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceCheck {
    pub location: String,
    /// Titles one of which a current local employee must hold; empty accepts any
    #[serde(default)]
    pub roles: Vec<String>,
    pub min_local_employees: Option<u64>,
}
