use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use leadmerge_engine::{
    discover_companies, export_csv, ContactSource, HubspotContactProperties, SearchSession,
    SessionOptions,
};
use normalizers::company_list::{merge_company_names, merge_queries, CompanyListParser};
use shared_types::{CompanyFilters, PresenceCheck, SearchFilters, SearchQuery};
use std::path::PathBuf;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::prelude::*;

mod config;
mod display;
mod integrations;

/// Companies beyond this many make rate limiting likely
const LARGE_SEARCH_WARNING: usize = 20;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProviderArg {
    Apollo,
    Hunter,
}

#[derive(Parser, Debug)]
#[command(name = "leadmerge", author, version, about = "Search people at target companies and export a deduplicated contact list", long_about = None)]
struct Args {
    /// Company name to search (repeatable)
    #[arg(long = "company", value_name = "NAME")]
    companies: Vec<String>,

    /// CSV or spreadsheet with a "Company name" (or "Company") column and optional "Domain" column
    #[arg(long, value_name = "PATH")]
    companies_file: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ProviderArg::Apollo)]
    provider: ProviderArg,

    /// Job title filter (repeatable)
    #[arg(long = "title", value_name = "TITLE")]
    titles: Vec<String>,

    /// Location filter (repeatable)
    #[arg(long = "location", value_name = "LOCATION")]
    locations: Vec<String>,

    /// Seniority filter, e.g. director, vp, c_suite (repeatable)
    #[arg(long = "seniority", value_name = "LEVEL")]
    seniorities: Vec<String>,

    /// Keep only contacts whose title contains one of these keywords (repeatable)
    #[arg(long = "role-keyword", value_name = "KEYWORD")]
    role_keywords: Vec<String>,

    /// Results requested per company
    #[arg(long)]
    per_page: Option<u32>,

    /// Write the deduplicated contacts to this CSV file
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Page of results to display (1-based)
    #[arg(long, default_value_t = 1)]
    page: usize,

    #[arg(long)]
    page_size: Option<usize>,

    /// Create every contact in HubSpot after the search
    #[arg(long)]
    push_hubspot: bool,

    #[arg(long)]
    log_file_path: Option<String>,

    /// Discover target companies with Coresignal before searching people
    #[arg(long)]
    discover: bool,

    #[arg(long, value_name = "INDUSTRY", requires = "discover")]
    discover_industry: Option<String>,

    #[arg(long, value_name = "COUNTRY", requires = "discover")]
    discover_country: Option<String>,

    #[arg(long, value_name = "LOCATION", requires = "discover")]
    discover_location: Option<String>,

    /// Headcount band, e.g. "51-200 employees"
    #[arg(long, value_name = "BAND", requires = "discover")]
    discover_size: Option<String>,

    #[arg(long, value_name = "N", requires = "discover")]
    discover_min_employees: Option<u32>,

    #[arg(long, value_name = "N", requires = "discover")]
    discover_min_funding_rounds: Option<u32>,

    /// Last funding round on or after this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", requires = "discover")]
    discover_funded_since: Option<String>,

    #[arg(long, value_name = "TYPE", requires = "discover")]
    discover_funding_type: Option<String>,

    #[arg(long, value_name = "DATE", requires = "discover")]
    discover_updated_since: Option<String>,

    /// Maximum companies returned by discovery
    #[arg(long, default_value_t = 20)]
    discover_limit: u32,

    /// Keep only discovered companies with a current employee in this location
    /// holding one of the --role-keyword titles
    #[arg(long, value_name = "LOCATION", requires = "discover")]
    presence_location: Option<String>,

    /// Minimum current employees in --presence-location
    #[arg(long, value_name = "N", requires = "presence_location")]
    min_local_employees: Option<u64>,
}

fn init_tracing(log_file_path: Option<&str>) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = log_file_path {
        let log_path = std::path::Path::new(log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("leadmerge.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stderr),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn company_filters(args: &Args) -> CompanyFilters {
    CompanyFilters {
        size: args.discover_size.clone(),
        industry: args.discover_industry.clone(),
        country: args.discover_country.clone(),
        location: args.discover_location.clone(),
        employees_count_gte: args.discover_min_employees,
        funding_total_rounds_count_gte: args.discover_min_funding_rounds,
        funding_last_round_date_gte: args.discover_funded_since.clone(),
        funding_last_round_type: args.discover_funding_type.clone(),
        last_updated_gte: args.discover_updated_since.clone(),
        limit: args.discover_limit,
    }
}

fn presence_check(args: &Args) -> Option<PresenceCheck> {
    args.presence_location.as_ref().map(|location| PresenceCheck {
        location: location.clone(),
        roles: args.role_keywords.clone(),
        min_local_employees: args.min_local_employees,
    })
}

async fn discover(
    args: &Args,
    config: &config::AppConfig,
    config_path: &std::path::Path,
    http: reqwest::Client,
    cancel: &CancellationToken,
) -> Result<Vec<SearchQuery>> {
    let api_key = config.api_keys().coresignal_api_key.ok_or_else(|| {
        anyhow::anyhow!("Missing api_keys.coresignal_api_key in config at {:?}", config_path)
    })?;
    let client = integrations::CoresignalClient::new(http, api_key);

    let companies = discover_companies(
        &client,
        &company_filters(args),
        presence_check(args).as_ref(),
        cancel,
    )
    .await
    .context("Company discovery failed")?;

    println!("Discovered {} companies", companies.len());
    Ok(companies)
}

fn build_queries(args: &Args, discovered: Vec<SearchQuery>) -> Result<Vec<SearchQuery>> {
    let mut queries = match &args.companies_file {
        Some(path) => CompanyListParser::new()
            .parse_file(path)
            .with_context(|| format!("Failed to read company list {}", path.display()))?,
        None => Vec::new(),
    };
    merge_company_names(&mut queries, &args.companies);
    merge_queries(&mut queries, discovered);

    if queries.is_empty() {
        anyhow::bail!("Provide at least one --company, a --companies-file, or --discover filters that match");
    }
    if queries.len() > LARGE_SEARCH_WARNING {
        tracing::warn!(
            "Searching {} companies; this may take a while and could hit provider rate limits",
            queries.len()
        );
    }

    Ok(queries)
}

fn build_source(
    args: &Args,
    config: &config::AppConfig,
    config_path: &std::path::Path,
    http: reqwest::Client,
) -> Result<Box<dyn ContactSource>> {
    let keys = config.api_keys();
    match args.provider {
        ProviderArg::Apollo => {
            if args.titles.is_empty() || args.locations.is_empty() {
                anyhow::bail!("Apollo searches need at least one --title and one --location");
            }
            let api_key = keys.apollo_api_key.ok_or_else(|| {
                anyhow::anyhow!("Missing api_keys.apollo_api_key in config at {:?}", config_path)
            })?;
            Ok(Box::new(integrations::ApolloClient::new(http, api_key)))
        }
        ProviderArg::Hunter => {
            let api_key = keys.hunter_api_key.ok_or_else(|| {
                anyhow::anyhow!("Missing api_keys.hunter_api_key in config at {:?}", config_path)
            })?;
            Ok(Box::new(integrations::HunterClient::new(http, api_key)))
        }
    }
}

async fn push_to_hubspot(session: &SearchSession, client: &integrations::HubspotClient) {
    let mut created = 0;
    for row in session.rows() {
        let properties = HubspotContactProperties::from_row(&row);
        if !properties.has_email() {
            tracing::warn!("Skipping HubSpot export of {}: no email", row.name);
            continue;
        }
        match client.create_contact(&properties).await {
            Ok(id) => {
                created += 1;
                tracing::info!("{} exported to HubSpot as {}", row.name, id);
            }
            Err(e) => tracing::error!("Failed to export {} to HubSpot: {:#}", row.name, e),
        }
    }
    println!("Exported {} contacts to HubSpot", created);
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file_path.as_deref());

    let (config, config_path) = config::AppConfig::load().context("Failed to load config")?;
    let search_config = config.search();

    let http = integrations::http_client(Duration::from_secs(search_config.request_timeout_secs))
        .context("Failed to build HTTP client")?;
    let source = build_source(&args, &config, &config_path, http.clone())?;

    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping after the current request");
            ctrl_c_token.cancel();
        }
    });

    let discovered = if args.discover {
        discover(&args, &config, &config_path, http.clone(), &cancel).await?
    } else {
        Vec::new()
    };
    let queries = build_queries(&args, discovered)?;

    let filters = SearchFilters {
        job_titles: args.titles.clone(),
        locations: args.locations.clone(),
        seniorities: args.seniorities.clone(),
        role_keywords: args.role_keywords.clone(),
        per_page: args.per_page.unwrap_or(search_config.per_page),
        page: 1,
    };
    let options = SessionOptions {
        delay: Duration::from_millis(search_config.delay_ms),
    };

    let mut session = SearchSession::new(filters);
    session
        .run(&*source, &queries, &options, &cancel)
        .await;

    print!("{}", display::render_report(session.report(), session.contacts()));
    println!();

    let page_size = args.page_size.unwrap_or(config.display().page_size);
    print!(
        "{}",
        display::render_page(session.contacts(), args.page, page_size)
    );

    if let Some(output) = &args.output {
        let count = export_csv(session.contacts(), output)
            .with_context(|| format!("Failed to export contacts to {}", output.display()))?;
        println!("Exported {} contacts to {}", count, output.display());
    }

    if args.push_hubspot {
        let token = config.api_keys().hubspot_access_token.ok_or_else(|| {
            anyhow::anyhow!(
                "Missing api_keys.hubspot_access_token in config at {:?}",
                config_path
            )
        })?;
        let client = integrations::HubspotClient::new(http, token);
        push_to_hubspot(&session, &client).await;
    }

    Ok(())
}
