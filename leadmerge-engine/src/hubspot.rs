use serde::Serialize;
use shared_types::export::present;
use shared_types::ExportRow;

/// Contact properties in the shape HubSpot's CRM contacts API expects.
/// Placeholder cells become empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HubspotContactProperties {
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub jobtitle: String,
    pub company: String,
    pub linkedinbio: String,
    pub city: String,
}

impl HubspotContactProperties {
    pub fn from_row(row: &ExportRow) -> Self {
        let value = |cell: &str| present(cell).unwrap_or_default().to_string();

        let mut words = present(&row.name).unwrap_or_default().split_whitespace();
        let firstname = words.next().unwrap_or_default().to_string();
        let lastname = words.collect::<Vec<_>>().join(" ");

        Self {
            email: value(&row.email),
            firstname,
            lastname,
            jobtitle: value(&row.title),
            company: value(&row.company),
            linkedinbio: value(&row.linkedin),
            city: value(&row.location),
        }
    }

    pub fn has_email(&self) -> bool {
        !self.email.is_empty()
    }
}
