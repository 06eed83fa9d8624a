use axum::{
    extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router,
};
use tracing::{error, info, warn};

use super::{error_response, AppState};

// ---

pub fn router() -> Router<AppState> {
    // ---
    Router::new().route("/api/analyze", post(handler))
}

/// Handle `POST /api/analyze`: summarize the latest reading.
async fn handler(State(state): State<AppState>) -> impl IntoResponse {
    // ---
    info!("POST /api/analyze");

    let Some(summarizer) = state.summarizer.as_ref() else {
        warn!("Analyze requested but no summarizer is configured");
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "Summaries are not configured",
        );
    };

    let reading = match state.source.latest().await {
        Ok(Some(reading)) => reading,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "No readings available"),
        Err(e) => {
            error!("Failed to fetch latest reading: {}", e);
            return error_response(StatusCode::BAD_GATEWAY, "Failed to fetch latest reading");
        }
    };

    match summarizer.summarize(&reading).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => {
            error!("Failed to summarize reading: {}", e);
            error_response(
                StatusCode::BAD_GATEWAY,
                "An error occurred while analyzing the data",
            )
        }
    }
}
