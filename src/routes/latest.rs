use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};
use serde::Serialize;
use tracing::{error, info, warn};

use super::{error_response, AppState};
use crate::{classify, Metric, Reading, Status};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/latest", get(handler))
}

/// One status card: the current value of a metric and its classification.
#[derive(Debug, Serialize)]
struct MetricCard {
    metric: Metric,
    value: f64,
    unit: &'static str,
    /// `None` when the value cannot be classified (non-finite).
    status: Option<Status>,
}

#[derive(Debug, Serialize)]
struct LatestResponse {
    reading: Option<Reading>,
    cards: Vec<MetricCard>,
}

async fn handler(State(state): State<AppState>) -> impl IntoResponse {
    // ---
    info!("GET /api/latest");

    let reading = match state.source.latest().await {
        Ok(reading) => reading,
        Err(e) => {
            error!("Failed to fetch latest reading: {}", e);
            return error_response(StatusCode::BAD_GATEWAY, "Failed to fetch latest reading");
        }
    };

    let cards = reading.as_ref().map(build_cards).unwrap_or_default();
    (StatusCode::OK, Json(LatestResponse { reading, cards })).into_response()
}

/// One card per metric present on the reading, in display order.
fn build_cards(reading: &Reading) -> Vec<MetricCard> {
    // ---
    Metric::ALL
        .iter()
        .filter_map(|&metric| {
            let value = reading.value(metric)?;
            let status = match classify(metric, value) {
                Ok(status) => Some(status),
                Err(e) => {
                    warn!("Skipping status for reading at {}: {}", reading.timestamp, e);
                    None
                }
            };
            Some(MetricCard {
                metric,
                value,
                unit: metric.settings().unit,
                status,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::Severity;

    #[test]
    fn test_cards_follow_present_metrics() {
        // ---
        let reading = Reading {
            timestamp: 1_714_568_400,
            ph: Some(5.0),
            temperature: None,
            tds: Some(600.0),
            turbidity: Some(f64::NAN),
        };

        let cards = build_cards(&reading);
        assert_eq!(cards.len(), 3);

        assert_eq!(cards[0].metric, Metric::Ph);
        let ph = cards[0].status.unwrap();
        assert_eq!((ph.label, ph.severity), ("Acidic", Severity::Warning));

        assert_eq!(cards[1].metric, Metric::Tds);
        let tds = cards[1].status.unwrap();
        assert_eq!((tds.label, tds.severity), ("Contaminated", Severity::Danger));

        assert_eq!(cards[2].metric, Metric::Turbidity);
        assert!(cards[2].status.is_none());
    }
}
