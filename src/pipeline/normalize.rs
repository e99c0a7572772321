/// Normalization of raw API records into decoded, ordered, windowed records
use log::warn;
use std::collections::BTreeMap;

use crate::models::{DecodedRecord, Payload, RawReading, RawRecord};
use crate::utils::parse_timestamp;

/// Sensor key under which a non-JSON textual payload is preserved.
pub const RAW_SENSOR_KEY: &str = "raw";

/// What to do with a textual payload that is not valid JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Drop the record (load-cell stream, where payloads must be JSON).
    Drop,
    /// Keep the record with a single `raw` reading holding the original text
    /// (weather-station stream, where payloads are sentence strings).
    RawText,
}

/// Decode, order and window one poll batch.
///
/// Records without a resolvable timestamp are discarded. Survivors are
/// stably sorted ascending by timestamp and truncated to the most recent
/// `window_size`. A malformed record never affects its neighbours.
pub fn normalize(
    raw: &[RawRecord],
    window_size: usize,
    policy: DecodePolicy,
) -> Vec<DecodedRecord> {
    let mut decoded: Vec<DecodedRecord> = raw
        .iter()
        .filter_map(|record| decode_record(record, policy))
        .collect();

    decoded.sort_by_key(|record| record.timestamp);

    if decoded.len() > window_size {
        decoded.drain(..decoded.len() - window_size);
    }

    decoded
}

fn decode_record(record: &RawRecord, policy: DecodePolicy) -> Option<DecodedRecord> {
    let raw_timestamp = record
        .timestamp
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(record.created_at.as_deref())
        .filter(|s| !s.is_empty())?;

    let timestamp = match parse_timestamp(raw_timestamp) {
        Some(ts) => ts,
        None => {
            warn!("Skipping record with unparseable timestamp: {}", raw_timestamp);
            return None;
        }
    };

    let readings = match record.data.as_ref()? {
        Payload::Json(map) => decode_readings(map),
        Payload::Text(text) => {
            match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(text) {
                Ok(map) => decode_readings(&map),
                Err(_) => match policy {
                    DecodePolicy::RawText => {
                        warn!("Non-JSON data detected, processing as raw string: {}", text);
                        let mut readings = BTreeMap::new();
                        readings.insert(
                            RAW_SENSOR_KEY.to_string(),
                            RawReading {
                                value: Some(text.clone()),
                                timestamp: None,
                            },
                        );
                        readings
                    }
                    DecodePolicy::Drop => {
                        warn!("Skipping record with non-JSON data: {}", text);
                        return None;
                    }
                },
            }
        }
    };

    Some(DecodedRecord { timestamp, readings })
}

/// Decode each sensor entry independently so one unreadable entry degrades
/// to an empty reading (coerced to 0 downstream) instead of losing the
/// whole record.
fn decode_readings(
    map: &serde_json::Map<String, serde_json::Value>,
) -> BTreeMap<String, RawReading> {
    map.iter()
        .map(|(sensor_id, value)| {
            let reading = serde_json::from_value(value.clone()).unwrap_or_else(|_| {
                warn!("Unreadable entry for sensor {}", sensor_id);
                RawReading::default()
            });
            (sensor_id.clone(), reading)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(timestamp: Option<&str>, created_at: Option<&str>, data: &str) -> RawRecord {
        serde_json::from_value(serde_json::json!({
            "timestamp": timestamp,
            "created_at": created_at,
            "data": serde_json::from_str::<serde_json::Value>(data)
                .unwrap_or_else(|_| serde_json::Value::String(data.to_string())),
        }))
        .unwrap()
    }

    #[test]
    fn drops_records_without_resolvable_timestamp() {
        let raw = vec![
            record(None, None, r#"{"S1":{"value":"1 N"}}"#),
            record(Some(""), Some(""), r#"{"S1":{"value":"2 N"}}"#),
            record(Some("garbage"), None, r#"{"S1":{"value":"3 N"}}"#),
            record(Some("2024-01-01T10:00:00Z"), None, r#"{"S1":{"value":"4 N"}}"#),
        ];
        let decoded = normalize(&raw, 50, DecodePolicy::Drop);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].readings["S1"].value.as_deref(), Some("4 N"));
    }

    #[test]
    fn falls_back_to_created_at() {
        let raw = vec![record(None, Some("2024-01-01T10:00:00Z"), r#"{"S1":{"value":"1"}}"#)];
        assert_eq!(normalize(&raw, 50, DecodePolicy::Drop).len(), 1);
    }

    #[test]
    fn sorts_ascending_by_timestamp() {
        let raw = vec![
            record(Some("2024-01-01T10:00:00Z"), None, r#"{"S1":{"value":"5 N"}}"#),
            record(Some("2024-01-01T09:00:00Z"), None, r#"{"S1":{"value":"3 N"}}"#),
        ];
        let decoded = normalize(&raw, 50, DecodePolicy::Drop);
        assert_eq!(decoded.len(), 2);
        assert!(decoded[0].timestamp < decoded[1].timestamp);
        assert_eq!(decoded[0].readings["S1"].value.as_deref(), Some("3 N"));
        assert_eq!(decoded[1].readings["S1"].value.as_deref(), Some("5 N"));
    }

    #[test]
    fn truncates_to_most_recent_window() {
        let raw: Vec<RawRecord> = (0..8)
            .map(|i| {
                let timestamp = format!("2024-01-01T10:0{}:00Z", i);
                record(Some(timestamp.as_str()), None, r#"{"S1":{"value":"1"}}"#)
            })
            .collect();
        let decoded = normalize(&raw, 3, DecodePolicy::Drop);
        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded[0].timestamp, parse_timestamp("2024-01-01T10:05:00Z").unwrap());
    }

    #[test]
    fn output_never_exceeds_window_size() {
        let raw = vec![record(Some("2024-01-01T10:00:00Z"), None, r#"{"S1":{"value":"1"}}"#)];
        assert!(normalize(&raw, 0, DecodePolicy::Drop).is_empty());
    }

    #[test]
    fn textual_json_payload_is_decoded() {
        let raw = vec![record(
            Some("2024-01-01T10:00:00Z"),
            None,
            r#""{\"S1\":{\"value\":\"7 N\"}}""#,
        )];
        let decoded = normalize(&raw, 50, DecodePolicy::Drop);
        assert_eq!(decoded[0].readings["S1"].value.as_deref(), Some("7 N"));
    }

    #[test]
    fn non_json_text_is_dropped_or_degraded_per_policy() {
        let raw = vec![record(Some("2024-01-01T10:00:00Z"), None, "$WIMWV,1,T,2,N")];

        assert!(normalize(&raw, 50, DecodePolicy::Drop).is_empty());

        let degraded = normalize(&raw, 50, DecodePolicy::RawText);
        assert_eq!(degraded.len(), 1);
        assert_eq!(
            degraded[0].readings[RAW_SENSOR_KEY].value.as_deref(),
            Some("$WIMWV,1,T,2,N")
        );
    }

    #[test]
    fn malformed_record_does_not_affect_neighbours() {
        let raw = vec![
            record(Some("2024-01-01T09:00:00Z"), None, r#"{"S1":{"value":"1"}}"#),
            record(Some("2024-01-01T09:30:00Z"), None, "not json at all"),
            record(Some("2024-01-01T10:00:00Z"), None, r#"{"S1":{"value":"2"}}"#),
        ];
        let decoded = normalize(&raw, 50, DecodePolicy::Drop);
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].readings["S1"].value.as_deref(), Some("1"));
        assert_eq!(decoded[1].readings["S1"].value.as_deref(), Some("2"));
    }

    #[test]
    fn unreadable_sensor_entry_degrades_to_empty_reading() {
        let raw = vec![record(
            Some("2024-01-01T10:00:00Z"),
            None,
            r#"{"S1":{"value":"1 N"},"S2":"just a string"}"#,
        )];
        let decoded = normalize(&raw, 50, DecodePolicy::Drop);
        assert_eq!(decoded[0].readings["S1"].value.as_deref(), Some("1 N"));
        assert_eq!(decoded[0].readings["S2"], RawReading::default());
    }
}
