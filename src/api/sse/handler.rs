//! SSE stream handler

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header::HeaderName, HeaderValue},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
};
use futures::StreamExt;

use crate::api::state::AppState;

/// Disables proxy buffering (nginx) so events are flushed immediately
const X_ACCEL_BUFFERING: HeaderName = HeaderName::from_static("x-accel-buffering");

/// GET /v1/devices/:device_id/stream - Live status updates for one device
pub async fn stream_device(
    State(state): State<Arc<AppState>>,
    Path(device_id): Path<String>,
) -> Response {
    let (subscription, snapshot) = state.hub.subscribe(&device_id);
    tracing::info!(
        device_id = %device_id,
        subscriber = subscription.id(),
        has_snapshot = snapshot.is_some(),
        "client connected"
    );

    // The subscription is released when axum drops this stream on disconnect
    let events = subscription.into_stream(snapshot).filter_map(|status| async move {
        match Event::default().json_data(&status) {
            Ok(event) => Some(Ok::<_, Infallible>(event)),
            Err(e) => {
                tracing::error!(device_id = %status.device_id, error = %e, "failed to encode status");
                None
            }
        }
    });

    let sse = Sse::new(events).keep_alive(KeepAlive::default().interval(state.keep_alive));
    ([(X_ACCEL_BUFFERING, HeaderValue::from_static("no"))], sse).into_response()
}
