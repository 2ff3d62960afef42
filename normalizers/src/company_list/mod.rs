mod csv_parser;
mod workbook;

pub use csv_parser::CsvParser;
pub use workbook::is_workbook;

use shared_types::{ImportError, SearchQuery};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

const COMPANY_COLUMNS: [&str; 2] = ["Company name", "Company"];
const DOMAIN_COLUMN: &str = "Domain";

/// Reads the list of companies a search session runs over, from CSV or a spreadsheet
pub struct CompanyListParser;

impl CompanyListParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_file(&self, path: &Path) -> Result<Vec<SearchQuery>, ImportError> {
        if !path.exists() {
            return Err(ImportError::InvalidInput(format!(
                "Company list {} does not exist",
                path.display()
            )));
        }

        if is_workbook(path) {
            let (headers, records) = workbook::read_first_sheet(path)?;
            return queries_from_records(&headers, &records);
        }

        let content = fs::read(path).map_err(|e| {
            ImportError::ParseError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        self.parse_csv(&content)
    }

    /// One query per distinct company name, in file order.
    ///
    /// The company column is `Company name` or `Company`; an optional `Domain`
    /// column attaches a known domain to the query. Semicolon-separated files
    /// are detected from the header line.
    pub fn parse_csv(&self, content: &[u8]) -> Result<Vec<SearchQuery>, ImportError> {
        let parser = CsvParser::with_delimiter(sniff_delimiter(content));
        let (headers, records) = parser.parse_to_maps(content)?;
        queries_from_records(&headers, &records)
    }
}

fn sniff_delimiter(content: &[u8]) -> u8 {
    let header = content.split(|&b| b == b'\n').next().unwrap_or_default();
    let count = |delimiter: u8| header.iter().filter(|&&b| b == delimiter).count();
    if count(b';') > count(b',') {
        b';'
    } else {
        b','
    }
}

fn queries_from_records(
    headers: &[String],
    records: &[HashMap<String, String>],
) -> Result<Vec<SearchQuery>, ImportError> {
    let company_column = COMPANY_COLUMNS
        .iter()
        .find(|column| headers.iter().any(|h| h.as_str() == **column))
        .ok_or_else(|| {
            ImportError::InvalidInput("Company list must contain a 'Company name' column".to_string())
        })?;

    let mut queries = Vec::new();
    for record in records {
        let Some(company) = record.get(*company_column).map(|s| s.trim()) else {
            continue;
        };
        if company.is_empty() {
            continue;
        }

        let domain = record
            .get(DOMAIN_COLUMN)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty());

        queries.push(match domain {
            Some(domain) => SearchQuery::with_domain(company, domain),
            None => SearchQuery::company(company),
        });
    }

    let mut distinct = Vec::new();
    merge_queries(&mut distinct, queries);

    tracing::info!(
        "Read {} companies from {} rows",
        distinct.len(),
        records.len()
    );

    Ok(distinct)
}

impl Default for CompanyListParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Append `additional` queries whose company is not already present, case-insensitively
pub fn merge_queries<I>(queries: &mut Vec<SearchQuery>, additional: I)
where
    I: IntoIterator<Item = SearchQuery>,
{
    let mut seen: HashSet<String> = queries.iter().map(|q| q.term.to_lowercase()).collect();
    for mut query in additional {
        query.term = query.term.trim().to_string();
        if !query.term.is_empty() && seen.insert(query.term.to_lowercase()) {
            queries.push(query);
        }
    }
}

/// Merge manually entered company names into an existing query list,
/// skipping blanks and names already present.
pub fn merge_company_names<I, S>(queries: &mut Vec<SearchQuery>, names: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    merge_queries(
        queries,
        names
            .into_iter()
            .map(|name| SearchQuery::company(name.as_ref())),
    );
}
