//! Data models for the water-quality dashboard.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

// ---

/// One of the four water-quality metrics reported by the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Ph,
    Temperature,
    Tds,
    Turbidity,
}

/// Per-metric chart and card configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSettings {
    pub label: &'static str,
    pub unit: &'static str,
    pub max_scale: f64,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Ph,
        Metric::Temperature,
        Metric::Tds,
        Metric::Turbidity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Ph => "ph",
            Metric::Temperature => "temperature",
            Metric::Tds => "tds",
            Metric::Turbidity => "turbidity",
        }
    }

    pub fn settings(&self) -> MetricSettings {
        // ---
        match self {
            Metric::Ph => MetricSettings {
                label: "pH Levels",
                unit: "pH",
                max_scale: 14.0,
            },
            Metric::Temperature => MetricSettings {
                label: "Temperature (°C)",
                unit: "°C",
                max_scale: 100.0,
            },
            Metric::Tds => MetricSettings {
                label: "TDS (ppm)",
                unit: "ppm",
                max_scale: 1000.0,
            },
            Metric::Turbidity => MetricSettings {
                label: "Turbidity (NTU)",
                unit: "NTU",
                max_scale: 100.0,
            },
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a path segment or query value names no known metric.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown metric '{0}' (expected ph, temperature, tds or turbidity)")]
pub struct UnknownMetric(pub String);

impl FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ph" => Ok(Metric::Ph),
            "temperature" => Ok(Metric::Temperature),
            "tds" => Ok(Metric::Tds),
            "turbidity" => Ok(Metric::Turbidity),
            _ => Err(UnknownMetric(s.to_string())),
        }
    }
}

/// A timestamped sensor record as stored in the reading store.
///
/// Any metric may be missing on a given record; a missing metric is simply
/// left out of that metric's trend buckets. A metric field holding something
/// other than a number counts as missing for that metric only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reading {
    // ---
    /// Epoch seconds. Fractional JSON timestamps are floored.
    #[serde(deserialize_with = "epoch_seconds")]
    pub timestamp: i64,
    #[serde(default, deserialize_with = "lenient_metric")]
    pub ph: Option<f64>,
    #[serde(default, deserialize_with = "lenient_metric")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "lenient_metric")]
    pub tds: Option<f64>,
    #[serde(default, deserialize_with = "lenient_metric")]
    pub turbidity: Option<f64>,
}

/// Any JSON value, keeping only whether it was a number.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Number(f64),
    Other(serde::de::IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum EpochSeconds {
    Whole(i64),
    Fractional(f64),
}

fn lenient_metric<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match LooseNumber::deserialize(deserializer)? {
        LooseNumber::Number(value) => Ok(Some(value)),
        LooseNumber::Other(_) => Ok(None),
    }
}

fn epoch_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match EpochSeconds::deserialize(deserializer)? {
        EpochSeconds::Whole(secs) => Ok(secs),
        EpochSeconds::Fractional(secs) if secs.is_finite() => Ok(secs.floor() as i64),
        EpochSeconds::Fractional(secs) => Err(serde::de::Error::custom(format!(
            "timestamp is not finite: {}",
            secs
        ))),
    }
}

impl Reading {
    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Ph => self.ph,
            Metric::Temperature => self.temperature,
            Metric::Tds => self.tds,
            Metric::Turbidity => self.turbidity,
        }
    }
}

/// Status tier used for badge coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Danger,
    Info,
}

/// Human-readable classification of a single metric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Status {
    pub severity: Severity,
    pub label: &'static str,
}

/// One slot of a trend series. `y` is `None` (serialized as `null`) for a gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    /// Bucket start, epoch milliseconds.
    pub x: i64,
    pub y: Option<f64>,
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_partial_record_deserializes() {
        // ---
        let json = r#"{"timestamp": 1714564800, "ph": 7.1, "tds": 120, "deviceId": "esp32"}"#;
        let reading: Reading = serde_json::from_str(json).unwrap();

        assert_eq!(reading.timestamp, 1_714_564_800);
        assert_eq!(reading.value(Metric::Ph), Some(7.1));
        assert_eq!(reading.value(Metric::Tds), Some(120.0));
        assert_eq!(reading.value(Metric::Temperature), None);
        assert_eq!(reading.value(Metric::Turbidity), None);
    }

    #[test]
    fn test_non_numeric_metric_counts_as_missing() {
        // ---
        let json = r#"{"timestamp": 1714565100.9, "ph": "n/a", "temperature": 25.0, "tds": null}"#;
        let reading: Reading = serde_json::from_str(json).unwrap();

        assert_eq!(reading.timestamp, 1_714_565_100);
        assert_eq!(reading.ph, None);
        assert_eq!(reading.temperature, Some(25.0));
        assert_eq!(reading.tds, None);
    }

    #[test]
    fn test_record_without_numeric_timestamp_is_rejected() {
        // ---
        assert!(serde_json::from_str::<Reading>(r#"{"ph": 7.0}"#).is_err());
        assert!(serde_json::from_str::<Reading>(r#"{"timestamp": "today", "ph": 7.0}"#).is_err());
    }

    #[test]
    fn test_metric_parsing() {
        // ---
        assert_eq!("ph".parse::<Metric>().unwrap(), Metric::Ph);
        assert_eq!("tds".parse::<Metric>().unwrap(), Metric::Tds);
        assert!("TDS".parse::<Metric>().is_err());
        assert!("temp".parse::<Metric>().is_err());
        assert!("salinity".parse::<Metric>().is_err());

        for metric in Metric::ALL {
            assert_eq!(metric.to_string().parse::<Metric>().unwrap(), metric);
        }
    }

    #[test]
    fn test_gap_serializes_as_null() {
        // ---
        let point = SeriesPoint { x: 300_000, y: None };
        let json = serde_json::to_value(point).unwrap();

        assert_eq!(json, serde_json::json!({"x": 300000, "y": null}));
    }

    #[test]
    fn test_metric_settings() {
        // ---
        assert_eq!(Metric::Ph.settings().max_scale, 14.0);
        assert_eq!(Metric::Tds.settings().unit, "ppm");
        assert_eq!(Metric::Turbidity.settings().label, "Turbidity (NTU)");
    }
}
