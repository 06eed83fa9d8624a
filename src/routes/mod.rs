//! HTTP gateway: the only module that knows the individual endpoints.

use axum::Router;

use crate::store::ReadingSource;
use crate::summarizer::Summarizer;

mod analyze;
mod health;
mod latest;
mod trend;

// ---

/// Shared handler state. Cheap to clone; holds no cached readings or charts.
#[derive(Debug, Clone)]
pub struct AppState {
    pub source: ReadingSource,
    pub summarizer: Option<Summarizer>,
}

pub fn router(state: AppState) -> Router {
    // ---
    Router::new()
        .merge(latest::router())
        .merge(trend::router())
        .merge(analyze::router())
        .merge(health::router())
        .with_state(state)
}

/// JSON error body shared by the endpoints.
#[derive(Debug, serde::Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(
    status: axum::http::StatusCode,
    message: impl Into<String>,
) -> axum::response::Response {
    use axum::response::IntoResponse;

    (
        status,
        axum::Json(ErrorBody {
            error: message.into(),
        }),
    )
        .into_response()
}
