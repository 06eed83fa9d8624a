//! Trailing 24-hour trend series built from irregular sensor readings.
//!
//! Readings are downsampled into fixed 5-minute buckets keyed by
//! `floor(timestamp / 300) * 300`. Each bucket keeps the maximum value seen
//! (a spike anywhere in the slot stays visible), and buckets with no reading
//! are emitted as gaps so the chart breaks the line instead of bridging it.
//!
//! # Clock injection
//! Every function takes `now` as a parameter instead of calling `Utc::now()`,
//! so the window is deterministic in tests. Callers recompute on every new
//! snapshot; nothing here caches state between calls.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Metric, Reading, SeriesPoint};

/// Bucket width in seconds.
pub const BUCKET_SECS: i64 = 300;

/// Length of the trailing window in seconds.
pub const WINDOW_SECS: i64 = 24 * 60 * 60;

/// Number of buckets in a window, both ends inclusive.
pub const WINDOW_SLOTS: usize = (WINDOW_SECS / BUCKET_SECS) as usize + 1;

// ---

/// Start of the 5-minute bucket containing `timestamp` (epoch seconds).
pub fn bucket_key(timestamp: i64) -> i64 {
    timestamp.div_euclid(BUCKET_SECS) * BUCKET_SECS
}

/// Bucket-aligned bounds of the trailing 24-hour window, epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendWindow {
    pub start: i64,
    pub end: i64,
}

impl TrendWindow {
    /// Window ending at `now`: truncate to the minute, step back 24 hours for
    /// the start, then snap both ends down to a bucket boundary.
    pub fn ending_at(now: DateTime<Utc>) -> Self {
        // ---
        let secs = now.timestamp();
        let minute = secs - secs.rem_euclid(60);

        TrendWindow {
            start: bucket_key(minute - WINDOW_SECS),
            end: bucket_key(minute),
        }
    }

    /// Bucket keys from start to end inclusive, ascending.
    pub fn bucket_keys(&self) -> impl Iterator<Item = i64> {
        (self.start..=self.end).step_by(BUCKET_SECS as usize)
    }

    pub fn slot_count(&self) -> usize {
        ((self.end - self.start) / BUCKET_SECS) as usize + 1
    }

    /// Whether a reading at `timestamp` lands in one of this window's buckets.
    pub fn covers(&self, timestamp: i64) -> bool {
        let key = bucket_key(timestamp);
        key >= self.start && key <= self.end
    }
}

/// Aggregate `readings` for one metric into the window ending at `now`.
///
/// Always returns exactly [`WINDOW_SLOTS`] points with `x` in epoch
/// milliseconds, strictly increasing by 300 000. Readings without a value for
/// `metric` are skipped; readings outside the window are bucketed but never
/// emitted. Values are taken as-is, without range checks.
pub fn aggregate(readings: &[Reading], metric: Metric, now: DateTime<Utc>) -> Vec<SeriesPoint> {
    // ---
    let window = TrendWindow::ending_at(now);

    let mut max_per_bucket: HashMap<i64, f64> = HashMap::new();
    for reading in readings {
        let Some(value) = reading.value(metric) else {
            continue;
        };
        max_per_bucket
            .entry(bucket_key(reading.timestamp))
            .and_modify(|max| {
                if value > *max {
                    *max = value;
                }
            })
            .or_insert(value);
    }

    window
        .bucket_keys()
        .map(|key| SeriesPoint {
            x: key * 1000,
            y: max_per_bucket.get(&key).copied(),
        })
        .collect()
}

/// Render-ready chart payload for one metric.
#[derive(Debug, Clone, Serialize)]
pub struct TrendChart {
    pub metric: Metric,
    pub label: &'static str,
    pub unit: &'static str,
    pub suggested_max: f64,
    /// Always `false`: gaps must show as breaks in the line.
    pub span_gaps: bool,
    pub window: TrendWindow,
    pub points: Vec<SeriesPoint>,
}

impl TrendChart {
    pub fn build(readings: &[Reading], metric: Metric, now: DateTime<Utc>) -> Self {
        // ---
        let settings = metric.settings();
        let window = TrendWindow::ending_at(now);
        let points = aggregate(readings, metric, now);
        tracing::debug!(
            metric = %metric,
            readings = readings.len(),
            outside_window = readings.iter().filter(|r| !window.covers(r.timestamp)).count(),
            filled = points.iter().filter(|p| p.y.is_some()).count(),
            "Built trend chart"
        );

        TrendChart {
            metric,
            label: settings.label,
            unit: settings.unit,
            suggested_max: settings.max_scale,
            span_gaps: false,
            window,
            points,
        }
    }
}
