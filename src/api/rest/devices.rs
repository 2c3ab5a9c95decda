//! Device status endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Serialize;

use super::ApiError;
use crate::api::state::AppState;
use crate::types::DeviceStatus;

/// Response for GET /v1/devices
#[derive(Debug, Serialize)]
pub struct DeviceList {
    pub devices: Vec<DeviceStatus>,
}

/// GET /v1/devices - Latest status of every known device
pub async fn list_devices(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let devices = state.hub.list_all();
    tracing::debug!(count = devices.len(), "listing devices");
    Json(DeviceList { devices })
}

/// GET /v1/devices/:device_id/latest - Latest status of one device
pub async fn get_latest(
    State(state): State<Arc<AppState>>,
    Path(device_id): Path<String>,
) -> impl IntoResponse {
    match state.hub.get_latest(&device_id) {
        Some(status) => (StatusCode::OK, Json(status)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ApiError::not_found("device not found")),
        )
            .into_response(),
    }
}

/// GET /v1/hub - Hub counters
pub async fn hub_stats(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.hub.stats())
}
