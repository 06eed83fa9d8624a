use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use tracing::{debug, error, info};

use super::{error_response, AppState};
use crate::{Metric, TrendChart, TrendWindow};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new()
        .route("/api/trend", get(all_metrics))
        .route("/api/trend/{metric}", get(one_metric))
}

/// Handle `GET /api/trend/{metric}`.
async fn one_metric(
    Path(metric): Path<String>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    // ---
    info!("GET /api/trend/{}", metric);

    let metric: Metric = match metric.parse() {
        Ok(metric) => metric,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };

    match charts(&state, &[metric]).await {
        Ok(mut charts) => match charts.pop() {
            Some(chart) => (StatusCode::OK, Json(chart)).into_response(),
            None => error_response(StatusCode::INTERNAL_SERVER_ERROR, "No chart built"),
        },
        Err(response) => response,
    }
}

/// Handle `GET /api/trend`: all four charts from a single snapshot.
async fn all_metrics(State(state): State<AppState>) -> impl IntoResponse {
    // ---
    info!("GET /api/trend");

    match charts(&state, &Metric::ALL).await {
        Ok(charts) => (StatusCode::OK, Json(charts)).into_response(),
        Err(response) => response,
    }
}

/// Fetch a fresh snapshot for the window ending now and build one chart per
/// metric from it.
///
/// The fetch runs through `now` rather than the snapped window end so the
/// current 5-minute bucket fills as readings arrive.
async fn charts(
    state: &AppState,
    metrics: &[Metric],
) -> Result<Vec<TrendChart>, axum::response::Response> {
    // ---
    let now = Utc::now();
    let window = TrendWindow::ending_at(now);
    debug!("Trend window [{}, {}]", window.start, window.end);

    let readings = state
        .source
        .readings_between(window.start, now.timestamp())
        .await
        .map_err(|e| {
            error!("Failed to fetch readings: {}", e);
            error_response(StatusCode::BAD_GATEWAY, "Failed to fetch readings")
        })?;

    Ok(metrics
        .iter()
        .map(|&metric| TrendChart::build(&readings, metric, now))
        .collect())
}
