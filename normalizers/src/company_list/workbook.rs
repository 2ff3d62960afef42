use calamine::{open_workbook_auto, Data, Reader};
use shared_types::ImportError;
use std::collections::HashMap;
use std::path::Path;

/// Spreadsheet extensions read through calamine rather than the CSV reader
pub const WORKBOOK_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

pub fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            WORKBOOK_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Header names plus one map per row of the first worksheet
pub fn read_first_sheet(
    path: &Path,
) -> Result<(Vec<String>, Vec<HashMap<String, String>>), ImportError> {
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        ImportError::ParseError(format!("Failed to open {}: {}", path.display(), e))
    })?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| {
            ImportError::InvalidInput(format!("{} has no worksheets", path.display()))
        })?
        .map_err(|e| ImportError::ParseError(e.to_string()))?;

    Ok(rows_to_maps(range.rows()))
}

fn rows_to_maps<'a>(
    mut rows: impl Iterator<Item = &'a [Data]>,
) -> (Vec<String>, Vec<HashMap<String, String>>) {
    let headers: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(|cell| cell.to_string().trim().to_string()).collect(),
        None => return (Vec::new(), Vec::new()),
    };

    let records: Vec<HashMap<String, String>> = rows
        .map(|row| {
            headers
                .iter()
                .zip(row)
                .filter(|(header, _)| !header.is_empty())
                .map(|(header, cell)| (header.clone(), cell.to_string().trim().to_string()))
                .collect()
        })
        .collect();

    (headers, records)
}
