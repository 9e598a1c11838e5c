use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::{debug, warn};

use crate::error::ForecastError;

pub(crate) fn error_status(err: &ForecastError) -> StatusCode {
    match err {
        ForecastError::NotFound { .. } => StatusCode::NOT_FOUND,
        ForecastError::InsufficientData { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ForecastError::InvalidGranularity(_)
        | ForecastError::InvalidHorizon { .. }
        | ForecastError::MissingParameter(_) => StatusCode::BAD_REQUEST,
        ForecastError::Store(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Renders as `{"error": {"kind": ..., "message": ...}}`.
impl IntoResponse for ForecastError {
    fn into_response(self) -> Response {
        let status = error_status(&self);
        if status.is_server_error() {
            warn!(kind = self.kind(), error = %self, "Forecast request failed");
        } else {
            debug!(kind = self.kind(), error = %self, "Forecast request rejected");
        }

        let body = Json(json!({
            "error": {
                "kind": self.kind(),
                "message": self.to_string(),
            }
        }));
        (status, body).into_response()
    }
}
