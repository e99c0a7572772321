/// Owned per-view state updated by the pollers
///
/// Each view owns its state outright; pollers push normalized batches in and
/// the daemon reads current values out for logging and export. Updates are
/// last-writer-wins when fetches overlap.
use std::collections::HashMap;

use crate::models::{DecodedRecord, SensorSeries, WeatherFrame};
use crate::pipeline::normalize::RAW_SENSOR_KEY;
use crate::pipeline::{accumulate, sentence, SeriesMode};
use crate::utils::format_datetime;

/// State behind the multi-sensor grid: load-cell series merged across poll
/// cycles plus the weather panel derived from the raw sentence buffer.
#[derive(Debug, Default)]
pub struct GridViewState {
    pub load_cell: HashMap<String, SensorSeries>,
    pub weather_raw: Vec<String>,
    pub weather: WeatherFrame,
    pub last_updated: Option<String>,
}

impl GridViewState {
    /// Merge a normalized load-cell batch into the per-sensor series.
    pub fn apply_load_cell(&mut self, batch: &[DecodedRecord], merge_cap: Option<usize>) {
        self.load_cell = accumulate(
            batch,
            std::mem::take(&mut self.load_cell),
            SeriesMode::Merge,
            merge_cap,
        );
        self.touch(batch);
    }

    /// Replace the raw sentence buffer and re-derive the weather frame.
    pub fn apply_weather(&mut self, batch: &[DecodedRecord]) {
        self.weather_raw = batch
            .iter()
            .map(|record| {
                record
                    .readings
                    .get(RAW_SENSOR_KEY)
                    .and_then(|reading| reading.value.clone())
                    .unwrap_or_else(|| "No Data".to_string())
            })
            .collect();
        self.weather = sentence::parse(&self.weather_raw);
        self.touch(batch);
    }

    fn touch(&mut self, batch: &[DecodedRecord]) {
        if let Some(last) = batch.last() {
            self.last_updated = Some(format_datetime(&last.timestamp));
        }
    }
}

/// State behind the aggregated chart: series rebuilt wholesale each cycle
/// plus the record buffer that feeds the export flow.
#[derive(Debug, Default)]
pub struct ChartViewState {
    pub series: HashMap<String, SensorSeries>,
    pub records: Vec<DecodedRecord>,
}

impl ChartViewState {
    pub fn apply(&mut self, batch: Vec<DecodedRecord>) {
        self.series = accumulate(
            &batch,
            std::mem::take(&mut self.series),
            SeriesMode::Replace,
            None,
        );
        self.records = batch;
    }
}
