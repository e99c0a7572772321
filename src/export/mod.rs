pub mod rows;
pub mod workbook;

use std::path::PathBuf;

use crate::config::ExportConfig;
use crate::errors::ExportError;
use crate::models::DecodedRecord;

pub use rows::build_export_rows;
pub use workbook::{export_file_name, write_workbook};

/// Build rows from the retained record buffer and write the workbook.
/// Returns the path of the generated file.
pub fn export_to_file(
    records: &[DecodedRecord],
    config: &ExportConfig,
) -> Result<PathBuf, ExportError> {
    let rows = build_export_rows(records, &config.start_date, &config.end_date)?;
    let path = config
        .output_dir
        .join(export_file_name(&config.start_date, &config.end_date));
    write_workbook(&rows, &path)?;
    Ok(path)
}
