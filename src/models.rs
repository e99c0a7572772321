use serde::Deserialize;
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// One entry of the telemetry API response, as received.
///
/// `timestamp` is the primary time field; some deployments only fill
/// `created_at`. Records where neither resolves are dropped before any
/// further processing.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub data: Option<Payload>,
}

/// The `data` field of a record: either an already-decoded JSON object or a
/// text blob that may or may not contain JSON. Discriminated here once so
/// downstream code never inspects types at runtime.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    Text(String),
    Json(serde_json::Map<String, serde_json::Value>),
}

/// One sensor's textual reading inside a record payload, e.g. `"12.3 N"`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RawReading {
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// A record that survived timestamp resolution and payload decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    pub timestamp: OffsetDateTime,
    pub readings: BTreeMap<String, RawReading>,
}

/// Ordered time series of one sensor. Labels and values grow in lockstep,
/// chronologically, by append only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorSeries {
    pub timestamps: Vec<String>,
    pub values: Vec<f64>,
}

impl SensorSeries {
    pub fn push(&mut self, label: String, value: f64) {
        self.timestamps.push(label);
        self.values.push(value);
    }

    /// Most recent reading, the "current value" shown to the user.
    pub fn latest(&self) -> Option<f64> {
        self.values.last().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop the oldest entries so at most `cap` remain.
    pub fn trim_to(&mut self, cap: usize) {
        if self.values.len() > cap {
            let excess = self.values.len() - cap;
            self.timestamps.drain(..excess);
            self.values.drain(..excess);
        }
    }
}

/// Weather metrics decoded from the raw sentence buffer. Re-derived in full
/// on every update; the metric series may have different lengths from each
/// other and from `timestamps` (one label per input group, readings per
/// sentence).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherFrame {
    pub wind_speed: Vec<f64>,
    pub wind_direction: Vec<f64>,
    pub pressure: Vec<f64>,
    pub temperature: Vec<f64>,
    pub humidity: Vec<f64>,
    pub timestamps: Vec<String>,
}

/// One spreadsheet row: a localized timestamp plus one cell per sensor
/// present in that record. Rows are not padded to a common schema; the
/// header union is computed at write time.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub timestamp: String,
    pub cells: Vec<(String, String)>,
}
