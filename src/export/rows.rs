/// Flattening of retained records into spreadsheet rows
use crate::errors::ExportError;
use crate::models::{DecodedRecord, ExportRow};
use crate::utils::format_datetime;

/// Cell text for a sensor present in a record but carrying no value.
const MISSING_VALUE: &str = "N/A";

/// Build export rows for the given date range.
///
/// Both dates must be non-empty or the export is rejected before any work
/// happens. The range itself only names the output file; every record with a
/// timestamp is exported, which is the behavior the dashboard always had.
pub fn build_export_rows(
    records: &[DecodedRecord],
    start_date: &str,
    end_date: &str,
) -> Result<Vec<ExportRow>, ExportError> {
    if start_date.trim().is_empty() || end_date.trim().is_empty() {
        return Err(ExportError::Validation);
    }

    let rows: Vec<ExportRow> = records
        .iter()
        .map(|record| ExportRow {
            timestamp: format_datetime(&record.timestamp),
            cells: record
                .readings
                .iter()
                .map(|(sensor_id, reading)| {
                    (
                        sensor_id.clone(),
                        reading
                            .value
                            .clone()
                            .unwrap_or_else(|| MISSING_VALUE.to_string()),
                    )
                })
                .collect(),
        })
        .collect();

    if rows.is_empty() {
        return Err(ExportError::EmptyResult);
    }

    Ok(rows)
}

/// Union of sensor columns across all rows, in first-appearance order.
pub fn column_order(rows: &[ExportRow]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for (sensor_id, _) in &row.cells {
            if !columns.iter().any(|c| c == sensor_id) {
                columns.push(sensor_id.clone());
            }
        }
    }
    columns
}
