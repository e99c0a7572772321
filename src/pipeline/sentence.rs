/// Decoding of NMEA-style weather station sentences
///
/// The station concatenates `$`-prefixed, comma-delimited sentences into one
/// composite string per record. Only the wind (`$WIMWV`) and meteorological
/// composite (`$WIMDA`) sentences are decoded; anything else is ignored.
use crate::models::WeatherFrame;
use crate::utils::now_time_label;

const WIND_TAG: &str = "$WIMWV";
const METEO_TAG: &str = "$WIMDA";

/// Decode a batch of composite sentence groups into a weather frame.
///
/// Stateless and side-effect free apart from the wall-clock label: one
/// timestamp is appended per input group no matter how many sentences or
/// readings that group produced.
pub fn parse(raw_groups: &[String]) -> WeatherFrame {
    let mut frame = WeatherFrame::default();

    for group in raw_groups {
        for sentence in split_sentences(group) {
            let fields: Vec<&str> = sentence.split(',').collect();
            match fields[0] {
                WIND_TAG => {
                    // Direction and speed are only meaningful together; a
                    // sentence missing either is dropped whole.
                    if let (Some(direction), Some(speed)) =
                        (field_value(&fields, 1), field_value(&fields, 3))
                    {
                        frame.wind_direction.push(direction);
                        frame.wind_speed.push(speed);
                    }
                }
                METEO_TAG => {
                    // Pressure, temperature and humidity are independent;
                    // each valid field is kept even when the others fail.
                    if let Some(pressure) = field_value(&fields, 3) {
                        frame.pressure.push(pressure);
                    }
                    if let Some(temperature) = field_value(&fields, 5) {
                        frame.temperature.push(temperature);
                    }
                    if let Some(humidity) = field_value(&fields, 9) {
                        frame.humidity.push(humidity);
                    }
                }
                _ => {}
            }
        }

        frame.timestamps.push(now_time_label());
    }

    frame
}

/// Split a composite string on `$` and re-prefix each surviving fragment so
/// every element is a complete sentence. Empty fragments are discarded.
fn split_sentences(group: &str) -> Vec<String> {
    group
        .split('$')
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| format!("${}", fragment))
        .collect()
}

fn field_value(fields: &[&str], index: usize) -> Option<f64> {
    fields.get(index).and_then(|field| field.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn splits_composite_group_into_complete_sentences() {
        let sentences = split_sentences("$WIMWV,1,T,2,N$WIMDA,,,3$GPGGA,x");
        assert_eq!(
            sentences,
            vec!["$WIMWV,1,T,2,N", "$WIMDA,,,3", "$GPGGA,x"]
        );
        assert!(sentences.iter().all(|s| s.starts_with('$')));
    }

    #[test]
    fn decodes_combined_wind_and_meteo_group() {
        let frame = parse(&groups(&[
            "$WIMWV,045,T,12.5,N$WIMDA,,,1013.2,,22.5,,,,55.0",
        ]));
        assert_eq!(frame.wind_direction, vec![45.0]);
        assert_eq!(frame.wind_speed, vec![12.5]);
        assert_eq!(frame.pressure, vec![1013.2]);
        assert_eq!(frame.temperature, vec![22.5]);
        assert_eq!(frame.humidity, vec![55.0]);
        assert_eq!(frame.timestamps.len(), 1);
    }

    #[test]
    fn wind_sentence_with_missing_field_emits_nothing() {
        let frame = parse(&groups(&["$WIMWV,,T,12.5,N"]));
        assert!(frame.wind_direction.is_empty());
        assert!(frame.wind_speed.is_empty());
        // The group still contributes a timestamp label.
        assert_eq!(frame.timestamps.len(), 1);
    }

    #[test]
    fn meteo_fields_are_validated_independently() {
        let frame = parse(&groups(&["$WIMDA,,,bad,,22.5,,,,also-bad"]));
        assert!(frame.pressure.is_empty());
        assert_eq!(frame.temperature, vec![22.5]);
        assert!(frame.humidity.is_empty());
    }

    #[test]
    fn unknown_tags_are_ignored() {
        let frame = parse(&groups(&["$GPGGA,123519,4807.038,N"]));
        assert!(frame.wind_direction.is_empty());
        assert!(frame.wind_speed.is_empty());
        assert!(frame.pressure.is_empty());
        assert!(frame.temperature.is_empty());
        assert!(frame.humidity.is_empty());
        assert_eq!(frame.timestamps.len(), 1);
    }

    #[test]
    fn one_timestamp_per_group_regardless_of_reading_count() {
        let frame = parse(&groups(&[
            "$WIMWV,10,T,1,N$WIMWV,20,T,2,N$WIMWV,30,T,3,N",
            "$WIMDA,,,1000.0,,20.0,,,,50.0",
        ]));
        assert_eq!(frame.wind_speed.len(), 3);
        assert_eq!(frame.timestamps.len(), 2);
    }

    #[test]
    fn identical_input_yields_identical_readings() {
        let input = groups(&["$WIMWV,045,T,12.5,N"]);
        let a = parse(&input);
        let b = parse(&input);
        assert_eq!(a.wind_direction, b.wind_direction);
        assert_eq!(a.wind_speed, b.wind_speed);
    }
}
