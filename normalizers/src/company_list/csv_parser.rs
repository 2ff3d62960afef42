use csv::{ReaderBuilder, Trim};
use shared_types::ImportError;
use std::collections::HashMap;

pub struct CsvParser {
    delimiter: u8,
}

impl CsvParser {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Header names plus one map per data row, keyed by header.
    ///
    /// Rows that fail to parse are logged and skipped.
    pub fn parse_to_maps(
        &self,
        content: &[u8],
    ) -> Result<(Vec<String>, Vec<HashMap<String, String>>), ImportError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(content);

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| ImportError::ParseError(e.to_string()))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut records = Vec::new();

        for result in reader.records() {
            match result {
                Ok(record) => {
                    let mut map = HashMap::new();
                    for (i, field) in record.iter().enumerate() {
                        if let Some(header) = headers.get(i) {
                            map.insert(header.clone(), field.to_string());
                        }
                    }
                    records.push(map);
                }
                Err(e) => {
                    tracing::warn!("Failed to parse CSV row: {}", e);
                }
            }
        }

        Ok((headers, records))
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new()
    }
}
