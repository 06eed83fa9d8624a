//! Threshold classification of metric values into dashboard statuses.
//!
//! Each metric has a fixed table of exclusive (`<`) or inclusive (`<=`) upper
//! bounds walked top to bottom. The first matching row wins; values above
//! every bound take the table's catch-all status.

use crate::models::{Metric, Severity, Status};

// ---

/// Errors produced by [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ClassifyError {
    /// NaN or infinite values have no meaningful status.
    #[error("non-finite {metric} value: {value}")]
    NonFinite { metric: Metric, value: f64 },
}

#[derive(Debug, Clone, Copy)]
enum Bound {
    Below(f64),
    AtMost(f64),
}

impl Bound {
    fn admits(self, value: f64) -> bool {
        match self {
            Bound::Below(limit) => value < limit,
            Bound::AtMost(limit) => value <= limit,
        }
    }
}

type Row = (Bound, &'static str, Severity);

/// Rows are checked in order; `otherwise` applies when none matches.
struct Table {
    rows: &'static [Row],
    otherwise: (&'static str, Severity),
}

const PH_TABLE: Table = Table {
    rows: &[
        (Bound::Below(5.0), "Very Acidic", Severity::Danger),
        (Bound::Below(6.0), "Acidic", Severity::Warning),
        (Bound::AtMost(7.5), "Neutral", Severity::Success),
        (Bound::AtMost(8.5), "Alkaline", Severity::Info),
    ],
    otherwise: ("Highly Alkaline", Severity::Danger),
};

const TEMPERATURE_TABLE: Table = Table {
    rows: &[
        (Bound::Below(10.0), "Freezing", Severity::Danger),
        (Bound::Below(20.0), "Cold", Severity::Info),
        (Bound::Below(28.0), "Optimal", Severity::Success),
        (Bound::Below(35.0), "Warm", Severity::Warning),
    ],
    otherwise: ("Hot", Severity::Danger),
};

const TDS_TABLE: Table = Table {
    rows: &[
        (Bound::Below(50.0), "Very Pure", Severity::Success),
        (Bound::Below(150.0), "Ideal", Severity::Info),
        (Bound::Below(300.0), "Fair", Severity::Warning),
        (Bound::Below(500.0), "Poor", Severity::Danger),
    ],
    otherwise: ("Contaminated", Severity::Danger),
};

const TURBIDITY_TABLE: Table = Table {
    rows: &[
        (Bound::Below(1.0), "Crystal Clear", Severity::Success),
        (Bound::Below(5.0), "Clear", Severity::Info),
        (Bound::Below(10.0), "Slightly Cloudy", Severity::Warning),
        (Bound::Below(20.0), "Cloudy", Severity::Danger),
    ],
    otherwise: ("Very Cloudy", Severity::Danger),
};

fn table(metric: Metric) -> &'static Table {
    match metric {
        Metric::Ph => &PH_TABLE,
        Metric::Temperature => &TEMPERATURE_TABLE,
        Metric::Tds => &TDS_TABLE,
        Metric::Turbidity => &TURBIDITY_TABLE,
    }
}

/// Classify a metric value against its threshold table.
///
/// Finite values outside the physical range of the metric are not clamped;
/// they land in the first or last row like any other value. NaN and
/// infinities are rejected.
pub fn classify(metric: Metric, value: f64) -> Result<Status, ClassifyError> {
    // ---
    if !value.is_finite() {
        return Err(ClassifyError::NonFinite { metric, value });
    }

    let table = table(metric);
    let (label, severity) = table
        .rows
        .iter()
        .find(|(bound, _, _)| bound.admits(value))
        .map(|&(_, label, severity)| (label, severity))
        .unwrap_or(table.otherwise);

    Ok(Status { severity, label })
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn label(metric: Metric, value: f64) -> &'static str {
        classify(metric, value).unwrap().label
    }

    #[test]
    fn test_ph_boundaries() {
        // ---
        assert_eq!(label(Metric::Ph, 4.99), "Very Acidic");
        assert_eq!(label(Metric::Ph, 5.0), "Acidic");
        assert_eq!(label(Metric::Ph, 5.5), "Acidic");
        assert_eq!(label(Metric::Ph, 5.99), "Acidic");
        assert_eq!(label(Metric::Ph, 6.0), "Neutral");
        assert_eq!(label(Metric::Ph, 7.5), "Neutral");
        assert_eq!(label(Metric::Ph, 7.51), "Alkaline");
        assert_eq!(label(Metric::Ph, 8.5), "Alkaline");
        assert_eq!(label(Metric::Ph, 8.51), "Highly Alkaline");
    }

    #[test]
    fn test_ph_five_is_acidic_warning() {
        // ---
        let status = classify(Metric::Ph, 5.0).unwrap();
        assert_eq!(status.label, "Acidic");
        assert_eq!(status.severity, Severity::Warning);
    }

    #[test]
    fn test_temperature_boundaries() {
        // ---
        assert_eq!(label(Metric::Temperature, 9.99), "Freezing");
        assert_eq!(label(Metric::Temperature, 10.0), "Cold");
        assert_eq!(label(Metric::Temperature, 20.0), "Optimal");
        assert_eq!(label(Metric::Temperature, 27.9), "Optimal");
        assert_eq!(label(Metric::Temperature, 28.0), "Warm");
        assert_eq!(label(Metric::Temperature, 35.0), "Hot");
        assert_eq!(
            classify(Metric::Temperature, 24.0).unwrap().severity,
            Severity::Success
        );
    }

    #[test]
    fn test_tds_boundaries() {
        // ---
        assert_eq!(label(Metric::Tds, 0.0), "Very Pure");
        assert_eq!(label(Metric::Tds, 50.0), "Ideal");
        assert_eq!(label(Metric::Tds, 150.0), "Fair");
        assert_eq!(label(Metric::Tds, 300.0), "Poor");
        assert_eq!(label(Metric::Tds, 499.9), "Poor");
        assert_eq!(label(Metric::Tds, 500.0), "Contaminated");

        let status = classify(Metric::Tds, 600.0).unwrap();
        assert_eq!(status.label, "Contaminated");
        assert_eq!(status.severity, Severity::Danger);
    }

    #[test]
    fn test_turbidity_boundaries() {
        // ---
        assert_eq!(label(Metric::Turbidity, 0.5), "Crystal Clear");
        assert_eq!(label(Metric::Turbidity, 1.0), "Clear");
        assert_eq!(label(Metric::Turbidity, 5.0), "Slightly Cloudy");
        assert_eq!(label(Metric::Turbidity, 10.0), "Cloudy");
        assert_eq!(label(Metric::Turbidity, 20.0), "Very Cloudy");
        assert_eq!(
            classify(Metric::Turbidity, 3.0).unwrap().severity,
            Severity::Info
        );
    }

    #[test]
    fn test_out_of_domain_values_fall_through() {
        // ---
        assert_eq!(label(Metric::Ph, -1.0), "Very Acidic");
        assert_eq!(label(Metric::Ph, 20.0), "Highly Alkaline");
        assert_eq!(label(Metric::Tds, -10.0), "Very Pure");
    }

    #[test]
    fn test_non_finite_values_rejected() {
        // ---
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                classify(Metric::Ph, value),
                Err(ClassifyError::NonFinite { metric: Metric::Ph, .. })
            ));
        }
    }
}
