/// Folding decoded records into per-sensor time series
use std::collections::HashMap;

use crate::models::{DecodedRecord, SensorSeries};
use crate::utils::format_time_label;

/// Unit suffixes stripped from textual readings before numeric parsing.
const UNIT_SUFFIXES: &[&str] = &[" N", " ppm"];

/// Accumulation policy for a poll batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesMode {
    /// Discard prior series and rebuild from the current batch only. Used
    /// where the normalizer window already bounds history.
    Replace,
    /// Keep prior entries and append the new batch. Growth is unbounded
    /// unless a retention cap is supplied.
    Merge,
}

/// Fold a decoded batch into the per-sensor series map.
///
/// Each reading becomes one `(HH:MM:SS label, value)` pair appended in
/// record order; series are created on first sight. In `Merge` mode
/// `merge_cap` bounds every series to its most recent entries; `None`
/// preserves indefinite accumulation.
pub fn accumulate(
    decoded: &[DecodedRecord],
    mut existing: HashMap<String, SensorSeries>,
    mode: SeriesMode,
    merge_cap: Option<usize>,
) -> HashMap<String, SensorSeries> {
    if mode == SeriesMode::Replace {
        existing.clear();
    }

    for record in decoded {
        let label = format_time_label(&record.timestamp);
        for (sensor_id, reading) in &record.readings {
            existing
                .entry(sensor_id.clone())
                .or_default()
                .push(label.clone(), coerce_value(reading.value.as_deref()));
        }
    }

    if mode == SeriesMode::Merge {
        if let Some(cap) = merge_cap {
            for series in existing.values_mut() {
                series.trim_to(cap);
            }
        }
    }

    existing
}

/// Coerce a textual reading to a number.
///
/// Strips one known trailing unit suffix, then parses. Missing or
/// unparseable values coerce to 0 rather than failing the record.
pub fn coerce_value(value: Option<&str>) -> f64 {
    let Some(text) = value else {
        return 0.0;
    };
    let stripped = UNIT_SUFFIXES
        .iter()
        .find_map(|suffix| text.strip_suffix(suffix))
        .unwrap_or(text);
    stripped.trim().parse().unwrap_or(0.0)
}
