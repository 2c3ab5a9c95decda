//! Sensor reading ingest endpoint

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::ApiError;
use crate::api::state::AppState;
use crate::types::{SensorReading, SensorResponse};

/// POST /v1/humidity - Evaluate a reading and publish the device's new status
pub async fn ingest_reading(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SensorReading>, JsonRejection>,
) -> Response {
    let Json(reading) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            let message = rejection.body_text();
            tracing::error!(error = %message, "failed to decode reading");
            return (StatusCode::BAD_REQUEST, Json(ApiError::bad_request(message))).into_response();
        }
    };

    if reading.device_id.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiError::bad_request("device_id is required")),
        )
            .into_response();
    }

    tracing::info!(
        device_id = %reading.device_id,
        humidity = reading.humidity,
        temperature = reading.temperature,
        "reading received"
    );

    let (assessment, report) = state.ingest(&reading.device_id, reading.humidity, reading.temperature);

    tracing::info!(
        device_id = %reading.device_id,
        alert = assessment.alert,
        message = %assessment.message,
        delivered = report.delivered,
        dropped = report.dropped,
        "reading evaluated"
    );

    Json(SensorResponse::ok(assessment.alert, assessment.message)).into_response()
}
