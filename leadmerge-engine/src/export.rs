use crate::contact_set::ContactSet;
use crate::projector::project;
use shared_types::ExportRow;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write a header row followed by every row; returns the number of data rows.
pub fn write_csv<W, I>(rows: I, writer: W) -> Result<usize, ExportError>
where
    W: Write,
    I: IntoIterator<Item = ExportRow>,
{
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(ExportRow::HEADERS)?;

    let mut count = 0;
    for row in rows {
        writer.write_record(row.values())?;
        count += 1;
    }

    writer.flush()?;
    Ok(count)
}

pub fn export_csv(set: &ContactSet, path: &Path) -> Result<usize, ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let count = write_csv(project(set), file)?;

    tracing::info!("Exported {} contacts to {}", count, path.display());
    Ok(count)
}
