/// HTTP access to the telemetry endpoint
use log::warn;
use std::time::Duration;
use url::Url;

use crate::config::MonitorConfig;
use crate::errors::FetchError;
use crate::models::RawRecord;

const API_KEY_HEADER: &str = "X-API-KEY";
const REQUEST_TIMEOUT_SECS: u64 = 30;

pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl ApiClient {
    pub fn new(config: &MonitorConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(ApiClient {
            http,
            base_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Fetch one batch of raw records for the given project stream.
    ///
    /// A non-array body is a shape error; individual entries that do not
    /// deserialize are skipped with a warning so the rest of the batch
    /// survives.
    pub async fn fetch_records(&self, project: &str) -> Result<Vec<RawRecord>, FetchError> {
        let response = self
            .http
            .get(self.base_url.clone())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .query(&[("project", project)])
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = response.json().await?;
        let entries = match body {
            serde_json::Value::Array(entries) => entries,
            other => return Err(FetchError::Shape(json_kind(&other))),
        };

        let records = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<RawRecord>(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping malformed {} record: {}", project, e);
                    None
                }
            })
            .collect();

        Ok(records)
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
