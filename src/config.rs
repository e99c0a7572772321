use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

use crate::errors::ConfigError;

const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
const DEFAULT_CHART_WINDOW: usize = 50;
const DEFAULT_GRID_WINDOW: usize = 10;

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub api_url: Url,
    pub api_key: String,
    pub poll_interval_secs: u64,
    /// Normalizer window for the aggregated chart view.
    pub chart_window: usize,
    /// Normalizer window for the per-sensor grid view.
    pub grid_window: usize,
    /// Optional retention cap for Merge-mode series. None keeps every entry.
    pub merge_cap: Option<usize>,
    /// When set, an xlsx export is written on shutdown.
    pub export: Option<ExportConfig>,
}

#[derive(Debug, Clone)]
pub struct ExportConfig {
    pub start_date: String,
    pub end_date: String,
    pub output_dir: PathBuf,
}

impl MonitorConfig {
    pub fn new() -> Result<Self, ConfigError> {
        // Load environment variables
        dotenv::dotenv().ok();

        let api_url_raw =
            env::var("LOURA_API_URL").map_err(|_| ConfigError::MissingVar("LOURA_API_URL"))?;
        let api_url = Url::parse(&api_url_raw).map_err(|e| ConfigError::InvalidVar {
            var: "LOURA_API_URL",
            reason: e.to_string(),
        })?;

        let api_key =
            env::var("LOURA_API_KEY").map_err(|_| ConfigError::MissingVar("LOURA_API_KEY"))?;

        let poll_interval_secs =
            parse_var("LOURA_POLL_INTERVAL_SECS")?.unwrap_or(DEFAULT_POLL_INTERVAL_SECS);
        let chart_window = parse_var("LOURA_CHART_WINDOW")?.unwrap_or(DEFAULT_CHART_WINDOW);
        let grid_window = parse_var("LOURA_GRID_WINDOW")?.unwrap_or(DEFAULT_GRID_WINDOW);
        let merge_cap = parse_var("LOURA_MERGE_CAP")?;

        // An export is requested as soon as either date variable is present;
        // range validation itself happens in the export flow.
        let start_date = env::var("LOURA_EXPORT_START").ok();
        let end_date = env::var("LOURA_EXPORT_END").ok();
        let export = if start_date.is_some() || end_date.is_some() {
            Some(ExportConfig {
                start_date: start_date.unwrap_or_default(),
                end_date: end_date.unwrap_or_default(),
                output_dir: env::var("LOURA_EXPORT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(".")),
            })
        } else {
            None
        };

        Ok(MonitorConfig {
            api_url,
            api_key,
            poll_interval_secs,
            chart_window,
            grid_window,
            merge_cap,
            export,
        })
    }
}

/// Read an optional numeric environment variable.
fn parse_var<T: FromStr>(var: &'static str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidVar {
                var,
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}
