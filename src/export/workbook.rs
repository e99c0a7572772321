/// Writing export rows into an xlsx workbook
use rust_xlsxwriter::Workbook;
use std::path::Path;

use crate::errors::ExportError;
use crate::export::rows::column_order;
use crate::models::ExportRow;

const SHEET_NAME: &str = "Sensor Data";
const TIMESTAMP_COLUMN: &str = "Timestamp";

/// File name for an export covering the given date range.
pub fn export_file_name(start_date: &str, end_date: &str) -> String {
    format!("LOURA_{}_to_{}.xlsx", start_date, end_date)
}

/// Write the rows into a single "Sensor Data" worksheet at `path`.
///
/// The header is the timestamp column followed by the sensor-column union in
/// first-appearance order; rows leave cells blank for sensors they do not
/// carry. Nothing is written when any cell or the save fails.
pub fn write_workbook(rows: &[ExportRow], path: &Path) -> Result<(), ExportError> {
    let columns = column_order(rows);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    sheet.write_string(0, 0, TIMESTAMP_COLUMN)?;
    for (index, column) in columns.iter().enumerate() {
        sheet.write_string(0, (index + 1) as u16, column.as_str())?;
    }

    for (row_index, row) in rows.iter().enumerate() {
        let row_number = (row_index + 1) as u32;
        sheet.write_string(row_number, 0, row.timestamp.as_str())?;
        for (sensor_id, value) in &row.cells {
            if let Some(column) = columns.iter().position(|c| c == sensor_id) {
                sheet.write_string(row_number, (column + 1) as u16, value.as_str())?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}
