/// Error taxonomy for the monitor
///
/// Per-record and per-field problems are deliberately NOT represented here:
/// they are contained where they occur (logged, then the record or field is
/// dropped or degraded) so one bad data point never stops a poll cycle.
use thiserror::Error;

/// Configuration loading failures. Fatal at startup only.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    MissingVar(&'static str),

    #[error("invalid {var}: {reason}")]
    InvalidVar { var: &'static str, reason: String },
}

/// Failures of one poll fetch. The tick is a no-op and the next tick retries.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unexpected response shape: expected a JSON array, got {0}")]
    Shape(&'static str),
}

/// User-initiated export failures. No partial file is ever written.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("please select a valid date range")]
    Validation,

    #[error("no data available for the selected range")]
    EmptyResult,

    #[error("failed to write workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
}
