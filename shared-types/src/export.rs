use serde::{Deserialize, Serialize};

/// Rendered in place of any absent field so exported tables keep uniform columns
pub const PLACEHOLDER: &str = "N/A";

/// One tabular output row. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Company")]
    pub company: String,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "LinkedIn")]
    pub linkedin: String,
}

impl ExportRow {
    pub const HEADERS: [&'static str; 6] =
        ["Name", "Title", "Email", "Company", "Location", "LinkedIn"];

    /// Cell values in column order
    pub fn values(&self) -> [&str; 6] {
        [
            &self.name,
            &self.title,
            &self.email,
            &self.company,
            &self.location,
            &self.linkedin,
        ]
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        Self::HEADERS
            .iter()
            .position(|header| *header == column)
            .map(|index| self.values()[index])
    }
}

/// Treat the placeholder as missing when a consumer needs the raw value back
pub fn present(cell: &str) -> Option<&str> {
    if cell == PLACEHOLDER || cell.is_empty() {
        None
    } else {
        Some(cell)
    }
}
