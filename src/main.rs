mod api;
mod config;
mod errors;
mod export;
mod models;
mod pipeline;
mod poller;
mod state;
mod utils;

use log::{error, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::time::Duration;

use api::{ApiClient, PROJECT_LOAD_CELL, PROJECT_WEATHER_STATION};
use config::MonitorConfig;
use models::RawRecord;
use pipeline::{normalize, DecodePolicy};
use state::{ChartViewState, GridViewState};

async fn fetch_batch(client: &ApiClient, project: &str) -> Option<Vec<RawRecord>> {
    match client.fetch_records(project).await {
        Ok(records) => non_empty_batch(records, project),
        Err(e) => {
            error!("Error fetching {} data: {}", project, e);
            None
        }
    }
}

/// An empty response is a no-op tick: the views keep their last good data.
fn non_empty_batch(records: Vec<RawRecord>, project: &str) -> Option<Vec<RawRecord>> {
    if records.is_empty() {
        warn!("API returned empty data for {}!", project);
        return None;
    }
    Some(records)
}

/// One grid-view tick: both streams, merged load-cell series plus the
/// re-derived weather frame.
async fn grid_tick(
    client: Arc<ApiClient>,
    state: Arc<Mutex<GridViewState>>,
    window: usize,
    merge_cap: Option<usize>,
) {
    let (load_cell, weather) = tokio::join!(
        fetch_batch(&client, PROJECT_LOAD_CELL),
        fetch_batch(&client, PROJECT_WEATHER_STATION),
    );

    if let Some(records) = load_cell {
        let batch = normalize(&records, window, DecodePolicy::Drop);
        state.lock().apply_load_cell(&batch, merge_cap);
    }
    if let Some(records) = weather {
        let batch = normalize(&records, window, DecodePolicy::RawText);
        state.lock().apply_weather(&batch);
    }

    log_grid_summary(&state.lock());
}

fn log_grid_summary(state: &GridViewState) {
    if let Some(updated) = &state.last_updated {
        info!("Grid view updated, last record at {}", updated);
    }
    for (sensor_id, series) in &state.load_cell {
        if series.is_empty() {
            continue;
        }
        if let Some(value) = series.latest() {
            info!(
                "  {}: latest value {:.2} ({} samples)",
                sensor_id,
                value,
                series.len()
            );
        }
    }
    let weather = &state.weather;
    if let (Some(speed), Some(direction)) = (
        weather.wind_speed.last(),
        weather.wind_direction.last(),
    ) {
        info!("  Wind: {:.1} m/s at {:.0}°", speed, direction);
    }
    if let Some(pressure) = weather.pressure.last() {
        info!("  Pressure: {:.1} hPa", pressure);
    }
    if let Some(temperature) = weather.temperature.last() {
        info!("  Temperature: {:.1} °C", temperature);
    }
    if let Some(humidity) = weather.humidity.last() {
        info!("  Humidity: {:.1} %", humidity);
    }
}

/// One chart-view tick: the aggregated load-cell chart rebuilt from the
/// latest window, retaining the record buffer for export.
async fn chart_tick(client: Arc<ApiClient>, state: Arc<Mutex<ChartViewState>>, window: usize) {
    if let Some(records) = fetch_batch(&client, PROJECT_LOAD_CELL).await {
        let batch = normalize(&records, window, DecodePolicy::Drop);
        state.lock().apply(batch);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match MonitorConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let client = Arc::new(ApiClient::new(&config)?);
    let grid_state = Arc::new(Mutex::new(GridViewState::default()));
    let chart_state = Arc::new(Mutex::new(ChartViewState::default()));

    info!("Starting LOURA telemetry monitor");
    let period = Duration::from_secs(config.poll_interval_secs);

    let grid_poller = {
        let client = client.clone();
        let state = grid_state.clone();
        let window = config.grid_window;
        let merge_cap = config.merge_cap;
        poller::spawn(period, move || {
            grid_tick(client.clone(), state.clone(), window, merge_cap)
        })
    };

    let chart_poller = {
        let client = client.clone();
        let state = chart_state.clone();
        let window = config.chart_window;
        poller::spawn(period, move || {
            chart_tick(client.clone(), state.clone(), window)
        })
    };

    // Poll until the user asks to stop.
    tokio::signal::ctrl_c().await?;
    info!("Program terminated by user. Exiting gracefully.");
    grid_poller.stop();
    chart_poller.stop();

    // A configured date range turns shutdown into an export of the retained
    // chart-view buffer.
    if let Some(export_config) = &config.export {
        let records = chart_state.lock().records.clone();
        match export::export_to_file(&records, export_config) {
            Ok(path) => info!("Excel file has been generated successfully: {}", path.display()),
            Err(e) => error!("Export failed: {}", e),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_cell_records() -> Vec<RawRecord> {
        vec![serde_json::from_str(
            r#"{"timestamp":"2024-01-01T10:00:00Z","data":{"S1":{"value":"5 N"}}}"#,
        )
        .unwrap()]
    }

    #[test]
    fn empty_response_yields_no_batch() {
        assert!(non_empty_batch(Vec::new(), PROJECT_LOAD_CELL).is_none());
        assert_eq!(
            non_empty_batch(load_cell_records(), PROJECT_LOAD_CELL).map(|r| r.len()),
            Some(1)
        );
    }

    // One empty poll must not wipe the retained series or the export buffer.
    #[test]
    fn empty_poll_leaves_chart_state_untouched() {
        let mut state = ChartViewState::default();
        state.apply(normalize(&load_cell_records(), 50, DecodePolicy::Drop));
        assert_eq!(state.records.len(), 1);

        if let Some(records) = non_empty_batch(Vec::new(), PROJECT_LOAD_CELL) {
            state.apply(normalize(&records, 50, DecodePolicy::Drop));
        }

        assert_eq!(state.records.len(), 1);
        assert_eq!(state.series["S1"].values, vec![5.0]);
    }

    #[test]
    fn empty_poll_leaves_grid_weather_untouched() {
        let weather: Vec<RawRecord> = vec![serde_json::from_str(
            r#"{"timestamp":"2024-01-01T10:00:00Z","data":"$WIMWV,045,T,12.5,N"}"#,
        )
        .unwrap()];

        let mut state = GridViewState::default();
        state.apply_weather(&normalize(&weather, 10, DecodePolicy::RawText));
        assert_eq!(state.weather.wind_direction, vec![45.0]);

        if let Some(records) = non_empty_batch(Vec::new(), PROJECT_WEATHER_STATION) {
            state.apply_weather(&normalize(&records, 10, DecodePolicy::RawText));
        }

        assert_eq!(state.weather.wind_direction, vec![45.0]);
        assert_eq!(state.weather_raw, vec!["$WIMWV,045,T,12.5,N"]);
    }
}
