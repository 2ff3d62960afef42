use anyhow::{Context, Result};
use leadmerge_engine::HubspotContactProperties;
use serde::Serialize;
use serde_json::Value;

const HUBSPOT_CONTACTS_URL: &str = "https://api.hubapi.com/crm/v3/objects/contacts";

#[derive(Serialize)]
struct CreateContactBody<'a> {
    properties: &'a HubspotContactProperties,
}

pub struct HubspotClient {
    http: reqwest::Client,
    access_token: String,
}

impl HubspotClient {
    pub fn new(http: reqwest::Client, access_token: impl Into<String>) -> Self {
        Self {
            http,
            access_token: access_token.into(),
        }
    }

    /// Create a CRM contact and return its HubSpot id
    pub async fn create_contact(&self, properties: &HubspotContactProperties) -> Result<String> {
        let response = self
            .http
            .post(HUBSPOT_CONTACTS_URL)
            .bearer_auth(&self.access_token)
            .json(&CreateContactBody { properties })
            .send()
            .await
            .context("HubSpot request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("HubSpot returned HTTP {}: {}", status.as_u16(), body.trim());
        }

        let body: Value = response
            .json()
            .await
            .context("HubSpot returned an unreadable response")?;

        body.get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("HubSpot response has no contact id"))
    }
}
